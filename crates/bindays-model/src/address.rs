use serde::{Deserialize, Serialize};

/// A candidate address as returned by the council address lookup.
///
/// `text` is the gazetteer string verbatim: inconsistent case, and it may
/// carry the postcode, the county, or the UPRN glued onto the end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawAddress {
    #[serde(rename = "address", alias = "text")]
    pub text: String,
    /// Unique Property Reference Number, stable across lookups.
    pub uprn: String,
}

/// A raw address bound to the postcode it was found under.
///
/// This is what the preference store keeps, both for the favourites list
/// and for the currently selected address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavouriteAddress {
    pub uprn: String,
    #[serde(alias = "address")]
    pub text: String,
    /// Older saves may lack this; see [`FavouriteAddress::is_complete`].
    #[serde(default)]
    pub postcode: String,
}

impl FavouriteAddress {
    pub fn new(
        uprn: impl Into<String>,
        text: impl Into<String>,
        postcode: impl Into<String>,
    ) -> Self {
        Self {
            uprn: uprn.into(),
            text: text.into(),
            postcode: postcode.into(),
        }
    }

    /// Bind a lookup result to the postcode that produced it.
    pub fn from_raw(raw: &RawAddress, postcode: &str) -> Self {
        Self::new(raw.uprn.clone(), raw.text.clone(), postcode)
    }

    /// Both identifiers needed for a schedule lookup are present.
    pub fn is_complete(&self) -> bool {
        !self.uprn.trim().is_empty() && !self.postcode.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_address_wire_name() {
        let raw: RawAddress =
            serde_json::from_str(r#"{"address": "HILL HEAD, PENRYN", "uprn": "100040012457"}"#)
                .unwrap();
        assert_eq!(raw.text, "HILL HEAD, PENRYN");

        let json = serde_json::to_value(&raw).unwrap();
        assert_eq!(json["address"], "HILL HEAD, PENRYN");
    }

    #[test]
    fn test_favourite_accepts_legacy_address_field() {
        let fav: FavouriteAddress = serde_json::from_str(
            r#"{"uprn": "1", "address": "FLAT 1, PENRYN", "postcode": "TR108JT"}"#,
        )
        .unwrap();
        assert_eq!(fav.text, "FLAT 1, PENRYN");
    }

    #[test]
    fn test_from_raw_and_completeness() {
        let raw = RawAddress {
            text: "HILL HEAD".to_string(),
            uprn: "100040012457".to_string(),
        };
        let fav = FavouriteAddress::from_raw(&raw, "TR108JT");
        assert_eq!(fav.postcode, "TR108JT");
        assert!(fav.is_complete());

        let missing_postcode = FavouriteAddress::new("100040012457", "HILL HEAD", "  ");
        assert!(!missing_postcode.is_complete());
        let missing_uprn = FavouriteAddress::new("", "HILL HEAD", "TR108JT");
        assert!(!missing_uprn.is_complete());
    }
}
