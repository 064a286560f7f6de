use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::enums::FeatureType;

/// One spliced product of a locus, referencing its features by id.
///
/// The feature list is ordered and many-to-many: a feature may be
/// shared by several transcripts. A dummy transcript carries no type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub id:                  String,
    pub transcript_type:     Option<FeatureType>,
    pub is_partial:          bool,
    pub is_reconstructed:    bool,
    pub is_type_in_question: bool,
    pub(crate) feature_ids:  Vec<String>,
    #[serde(skip)]
    pub(crate) locus_id: String,
}

impl Transcript {
    pub fn new(
        id: String,
        transcript_type: Option<FeatureType>,
    ) -> Self {
        Transcript {
            id,
            transcript_type,
            is_partial: false,
            is_reconstructed: false,
            is_type_in_question: false,
            feature_ids: Vec::new(),
            locus_id: String::new(),
        }
    }

    pub fn feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    pub fn locus_id(&self) -> &str {
        &self.locus_id
    }

    pub(crate) fn link_feature(
        &mut self,
        feature_id: &str,
    ) {
        if !self.feature_ids.iter().any(|f| f == feature_id) {
            self.feature_ids.push(feature_id.to_string());
        }
    }

    pub(crate) fn remove_feature(
        &mut self,
        feature_id: &str,
    ) {
        if let Some(pos) =
            self.feature_ids.iter().position(|f| f == feature_id)
        {
            self.feature_ids.remove(pos);
        }
    }
}
