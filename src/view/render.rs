use crate::gate::GateState;
use crate::models::PropertyDetail;
use serde::Serialize;

/// Blocks of the property page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Address,
    PreviewImage,
    Features,
    Estimate,
    RentalEstimate,
    SuburbInsights,
    Comparables,
    Schools,
    SalesHistory,
    Gallery,
}

pub const ALL_SECTIONS: [Section; 10] = [
    Section::Address,
    Section::PreviewImage,
    Section::Features,
    Section::Estimate,
    Section::RentalEstimate,
    Section::SuburbInsights,
    Section::Comparables,
    Section::Schools,
    Section::SalesHistory,
    Section::Gallery,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderMode {
    Clear,
    /// Rendered blurred and non-interactive
    Obscured,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub section: Section,
    pub mode: RenderMode,
    pub interactive: bool,
}

impl Section {
    /// Top-level keys of a serialized `PropertyDetail` that belong to this section
    fn detail_keys(self) -> &'static [&'static str] {
        match self {
            Section::Address | Section::PreviewImage | Section::Gallery => &[],
            Section::Features => &["beds", "baths", "parking", "landSize"],
            Section::Estimate => &["priceEstimate"],
            Section::RentalEstimate => &["rentalEstimate"],
            Section::SuburbInsights => &["suburbInsights"],
            Section::Comparables => &["comparables"],
            Section::Schools => &["schools"],
            Section::SalesHistory => &["salesHistory"],
        }
    }
}

/// How each section of a report is shown for the current gate state.
///
/// While locked only the address and a single preview image are clear.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    pub gate: GateState,
    pub sections: Vec<SectionView>,
    pub preview_image: Option<String>,
}

impl RenderPlan {
    pub fn new(detail: &PropertyDetail, gate: GateState) -> Self {
        let sections = ALL_SECTIONS
            .iter()
            .map(|&section| {
                let clear = gate == GateState::Unlocked
                    || matches!(section, Section::Address | Section::PreviewImage);
                SectionView {
                    section,
                    mode: if clear {
                        RenderMode::Clear
                    } else {
                        RenderMode::Obscured
                    },
                    interactive: clear,
                }
            })
            .collect();

        Self {
            gate,
            sections,
            preview_image: detail.images.first().cloned(),
        }
    }

    pub fn mode(&self, section: Section) -> RenderMode {
        self.sections
            .iter()
            .find(|s| s.section == section)
            .map(|s| s.mode)
            .unwrap_or(RenderMode::Obscured)
    }

    pub fn is_obscured(&self, section: Section) -> bool {
        self.mode(section) == RenderMode::Obscured
    }

    /// The report as JSON with every obscured section left out
    pub fn visible_json(&self, detail: &PropertyDetail) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(detail)?;
        if let Some(fields) = value.as_object_mut() {
            for view in self.sections.iter().filter(|s| s.mode == RenderMode::Obscured) {
                for key in view.section.detail_keys() {
                    fields.remove(*key);
                }
            }
            fields.insert("images".into(), serde_json::to_value(self.visible_images(detail))?);
        }
        Ok(value)
    }

    /// Images shown in the clear
    pub fn visible_images<'a>(&self, detail: &'a PropertyDetail) -> &'a [String] {
        match self.gate {
            GateState::Unlocked => &detail.images,
            GateState::Locked => &detail.images[..detail.images.len().min(1)],
        }
    }
}
