use crate::domain::model::BusinessCard;

/// vCard 3.0 payload for the "save contact" QR code.
pub fn business_card_vcard(card: &BusinessCard) -> String {
    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", escape_value(&card.name)),
        format!("ORG:{}", escape_value(&card.name)),
    ];

    if let Some(phone) = non_empty(&card.phone) {
        lines.push(format!("TEL:{}", escape_value(phone)));
    }
    if let Some(email) = non_empty(&card.email) {
        lines.push(format!("EMAIL:{}", escape_value(email)));
    }
    if let Some(website) = non_empty(&card.website) {
        lines.push(format!("URL:{}", website.trim()));
    }
    if let Some(instagram) = non_empty(&card.instagram) {
        lines.push(format!("NOTE:Instagram: {}", escape_value(instagram)));
    }

    lines.push("END:VCARD".to_string());
    lines.join("\n")
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// RFC 2426 text escaping.
fn escape_value(value: &str) -> String {
    value
        .trim()
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace('\n', "\\n")
}
