use serde::{Deserialize, Serialize};

/// Brand attributes inferred for a website.
///
/// Serialized with the camelCase keys the web client reads. Both color
/// fields are always populated `#RRGGBB` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandProfile {
    pub brand_name: String,
    pub offer_details: String,
    pub target_audience: String,
    pub brand_positioning: String,
    /// First 1000 characters of the cleaned page text.
    pub raw_content: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub brand_mood: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let profile = BrandProfile {
            brand_name: "Shop".to_string(),
            offer_details: "Sells hats".to_string(),
            target_audience: "Adults".to_string(),
            brand_positioning: "Affordable".to_string(),
            raw_content: "hello".to_string(),
            primary_color: "#ff0000".to_string(),
            secondary_color: "#00ff00".to_string(),
            brand_mood: "Playful".to_string(),
        };
        let json = serde_json::to_value(&profile).expect("serialize");
        assert_eq!(json["brandName"], "Shop");
        assert_eq!(json["rawContent"], "hello");
        assert_eq!(json["primaryColor"], "#ff0000");
        assert_eq!(json["brandMood"], "Playful");
        assert!(json.get("brand_name").is_none());
    }
}
