//! HTML bodies for each message type.

use crate::email::message::{ContactEmail, EmailMessage, LeadEmail, ReportEmail};
use crate::models::{Sale, SchoolType};

/// Fully rendered email ready for a provider
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `845000` -> `$845,000`
pub fn format_money(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Render a message. Contact and lead messages go to `inbox`; reports go to the submitter.
pub fn render(message: &EmailMessage, inbox: &str) -> RenderedEmail {
    match message {
        EmailMessage::Contact(contact) => render_contact(contact, inbox),
        EmailMessage::Lead(lead) => render_lead(lead, inbox),
        EmailMessage::Report(report) => render_report(report),
    }
}

fn row(label: &str, value: &str) -> String {
    format!(
        "<tr><th align=\"left\">{}</th><td>{}</td></tr>",
        escape_html(label),
        escape_html(value)
    )
}

fn render_contact(contact: &ContactEmail, inbox: &str) -> RenderedEmail {
    let name = format!("{} {}", contact.first_name, contact.last_name);
    let html = format!(
        "<h2>New contact enquiry</h2><table>{}{}{}</table><p class=\"message\">{}</p>",
        row("Name", &name),
        row("Email", &contact.email),
        row("Phone", &contact.phone),
        escape_html(&contact.message).replace('\n', "<br>"),
    );
    RenderedEmail {
        to: inbox.to_string(),
        reply_to: Some(contact.email.clone()),
        subject: format!("New contact enquiry from {}", name.trim()),
        html,
    }
}

fn render_lead(lead: &LeadEmail, inbox: &str) -> RenderedEmail {
    let address = lead.property_address.as_deref().unwrap_or("No property selected");
    let html = format!(
        "<h2>Property report requested</h2><table>{}{}{}{}{}</table>",
        row("Name", &lead.name),
        row("Email", &lead.email),
        row("Property", address),
        row("Suburb", lead.property_suburb.as_deref().unwrap_or("-")),
        row("Property ID", lead.property_id.as_deref().unwrap_or("-")),
    );
    RenderedEmail {
        to: inbox.to_string(),
        reply_to: Some(lead.email.clone()),
        subject: format!("Report requested: {}", address),
        html,
    }
}

fn sale_rows(sales: &[Sale]) -> String {
    sales
        .iter()
        .map(|s| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{} bd / {} ba / {} car</td></tr>",
                escape_html(&s.address),
                format_money(s.sale_price),
                s.sale_date.format("%d %b %Y"),
                s.beds,
                s.baths,
                s.parking
            )
        })
        .collect()
}

fn render_report(report: &ReportEmail) -> RenderedEmail {
    let p = &report.property;
    let estimate = p.price_estimate;
    let insights = &p.suburb_insights;

    let greeting = if report.name.trim().is_empty() {
        "Hi,".to_string()
    } else {
        format!("Hi {},", escape_html(report.name.trim()))
    };

    let rental = p
        .rental_estimate
        .map(|r| {
            format!(
                "<p id=\"rental\">Estimated rent: {} - {} per week</p>",
                format_money(r.weekly_low),
                format_money(r.weekly_high)
            )
        })
        .unwrap_or_default();

    let schools: String = p
        .schools
        .iter()
        .map(|s| {
            let kind = match s.school_type {
                SchoolType::Public => "Public",
                SchoolType::Private => "Private",
            };
            format!(
                "<li>{} ({}, {}) - {:.1}/10, {:.1} km</li>",
                escape_html(&s.name),
                kind,
                escape_html(&s.year_range),
                s.rating,
                s.distance_km
            )
        })
        .collect();

    let html = format!(
        concat!(
            "<p>{greeting}</p>",
            "<h1>{address}</h1>",
            "<section id=\"estimate\"><h2>Estimated value</h2>",
            "<p><span class=\"low\">{low}</span> - <strong class=\"mid\">{mid}</strong> - <span class=\"high\">{high}</span></p>{rental}</section>",
            "<section id=\"suburb\"><h2>{suburb} market</h2><table>{median}{growth}{dom}{clearance}</table></section>",
            "<section id=\"comparables\"><h2>Comparable sales</h2><table>{comparables}</table></section>",
            "<section id=\"schools\"><h2>Nearby schools</h2><ul>{schools}</ul></section>",
            "<section id=\"history\"><h2>Sales history</h2><table>{history}</table></section>",
        ),
        greeting = greeting,
        address = escape_html(&p.summary.display_address),
        low = format_money(estimate.low),
        mid = format_money(estimate.mid),
        high = format_money(estimate.high),
        rental = rental,
        suburb = escape_html(&p.summary.suburb),
        median = row("Median price", &format_money(insights.median_price)),
        growth = row("Annual growth", &format!("{:.1}%", insights.growth_percent)),
        dom = row("Days on market", &insights.days_on_market.to_string()),
        clearance = row("Clearance rate", &format!("{:.0}%", insights.clearance_rate)),
        comparables = sale_rows(&p.comparables),
        schools = schools,
        history = sale_rows(&p.sales_history),
    );

    RenderedEmail {
        to: report.email.clone(),
        reply_to: None,
        subject: format!("Your property report for {}", p.summary.display_address),
        html,
    }
}
