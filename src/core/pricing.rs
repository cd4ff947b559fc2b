use std::collections::BTreeMap;

pub const PRICE_PER_PAGE: u32 = 50;

/// Selections from the website-request wizard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteOptions {
    pub pages: u32,
    pub seo_level: String,
    pub delivery_time: String,
    pub theme: String,
    pub support_level: String,
    pub features: BTreeMap<String, bool>,
}

fn seo_price(level: &str) -> u32 {
    match level {
        "advanced" => 50,
        _ => 0,
    }
}

fn delivery_price(delivery: &str) -> u32 {
    match delivery {
        "rush" => 50,
        _ => 0,
    }
}

fn theme_price(theme: &str) -> u32 {
    match theme {
        "custom" => 50,
        _ => 0,
    }
}

fn support_price(level: &str) -> u32 {
    match level {
        "standard" => 30,
        "priority" => 50,
        _ => 0,
    }
}

fn feature_price(feature: &str) -> u32 {
    match feature {
        "imageGallery" => 30,
        "socialMedia" => 25,
        "blog" => 40,
        "darkMode" => 25,
        "customFeatures" => 50,
        _ => 0,
    }
}

/// Estimated price in whole dollars. Unknown option names cost nothing.
///
/// `None` when the page count is too large to price.
pub fn estimate(options: &QuoteOptions) -> Option<u32> {
    let features: u32 = options
        .features
        .iter()
        .filter(|(_, selected)| **selected)
        .map(|(name, _)| feature_price(name))
        .sum();

    options
        .pages
        .checked_mul(PRICE_PER_PAGE)?
        .checked_add(seo_price(&options.seo_level))?
        .checked_add(delivery_price(&options.delivery_time))?
        .checked_add(theme_price(&options.theme))?
        .checked_add(support_price(&options.support_level))?
        .checked_add(features)
}

/// Leading integer of a label such as `"3 pages"`.
pub fn parse_page_count(pages: &str) -> Option<u32> {
    let digits: String = pages
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_quote_is_pages_only() {
        let options = QuoteOptions {
            pages: 3,
            seo_level: "basic".to_string(),
            delivery_time: "standard".to_string(),
            theme: "modern".to_string(),
            support_level: "basic".to_string(),
            features: BTreeMap::new(),
        };
        assert_eq!(estimate(&options), Some(150));
    }

    #[test]
    fn every_upgrade_is_added() {
        let features = ["imageGallery", "socialMedia", "blog", "darkMode", "customFeatures"]
            .iter()
            .map(|f| (f.to_string(), true))
            .collect();
        let options = QuoteOptions {
            pages: 5,
            seo_level: "advanced".to_string(),
            delivery_time: "rush".to_string(),
            theme: "custom".to_string(),
            support_level: "priority".to_string(),
            features,
        };
        // 250 + 50 + 50 + 50 + 50 + (30 + 25 + 40 + 25 + 50)
        assert_eq!(estimate(&options), Some(620));
    }

    #[test]
    fn unselected_and_unknown_features_are_free() {
        let mut features = BTreeMap::new();
        features.insert("blog".to_string(), false);
        features.insert("hologram".to_string(), true);
        let options = QuoteOptions {
            pages: 1,
            features,
            ..QuoteOptions::default()
        };
        assert_eq!(estimate(&options), Some(50));
    }

    #[test]
    fn oversized_page_count_cannot_be_priced() {
        let options = QuoteOptions {
            pages: parse_page_count("99999999 pages").unwrap(),
            seo_level: "advanced".to_string(),
            ..QuoteOptions::default()
        };
        assert_eq!(estimate(&options), None);

        let options = QuoteOptions {
            pages: u32::MAX / PRICE_PER_PAGE,
            support_level: "priority".to_string(),
            ..QuoteOptions::default()
        };
        assert_eq!(estimate(&options), None);
    }

    #[test]
    fn page_labels() {
        assert_eq!(parse_page_count("3 pages"), Some(3));
        assert_eq!(parse_page_count("1 page"), Some(1));
        assert_eq!(parse_page_count("many"), None);
    }
}
