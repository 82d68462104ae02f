//! Classification: feature scalars in, (label, stage, confidence) out.
//!
//! This module defines the [`Classifier`] trait for pluggable
//! classification strategies and the [`ClassifierKind`] enum for
//! selecting which strategy to use at runtime.
//!
//! # Strategy pattern
//!
//! The rule-based strategy is a fixed threshold ladder over the
//! feature scalars; first matching rule wins, and the confidence of
//! each rule is a constant, not a calibrated probability. The stub
//! strategy ignores the features entirely and samples a random result,
//! preserved from an early prototype of the reference service so that
//! the deterministic path can be exercised in isolation.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::types::FeatureSet;

/// The closed set of labels the service can emit.
///
/// Serialized strings match the reference service's wire format
/// exactly; no other label can ever appear in a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TumorClass {
    #[serde(rename = "Healthy Pancreas")]
    HealthyPancreas,
    #[serde(rename = "Insufficient Features Detected")]
    InsufficientFeatures,
    #[serde(rename = "Pancreatic Neuroendocrine Tumor")]
    NeuroendocrineTumor,
    #[serde(rename = "Mucinous Cystic Neoplasm")]
    MucinousCysticNeoplasm,
    #[serde(rename = "Ductal Adenocarcinoma")]
    DuctalAdenocarcinoma,
    #[serde(rename = "Acinar Cell Carcinoma")]
    AcinarCellCarcinoma,
    #[serde(rename = "Intraductal Papillary Mucinous Neoplasm")]
    IntraductalPapillaryMucinousNeoplasm,
    #[serde(rename = "Solid Pseudopapillary Neoplasm")]
    SolidPseudopapillaryNeoplasm,
    #[serde(rename = "Serous Cystadenoma")]
    SerousCystadenoma,
    #[serde(rename = "Pancreatic Adenosquamous Carcinoma")]
    AdenosquamousCarcinoma,
    #[serde(rename = "Potential Early Stage Abnormality")]
    EarlyStageAbnormality,
}

/// The closed set of stage strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "N/A")]
    NotApplicable,
    #[serde(rename = "Stage I")]
    StageI,
    #[serde(rename = "Stage II")]
    StageII,
    #[serde(rename = "Stage III")]
    StageIII,
    #[serde(rename = "Early Stage")]
    EarlyStage,
    #[serde(rename = "Early Detection")]
    EarlyDetection,
}

/// A normalized bounding box marking a "finding region".
///
/// Only the stub strategy produces these; coordinates and extents are
/// fractions of the image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FindingRegion {
    /// Left edge as a fraction of image width.
    pub x: f64,
    /// Top edge as a fraction of image height.
    pub y: f64,
    /// Width as a fraction of image width.
    pub width: f64,
    /// Height as a fraction of image height.
    pub height: f64,
}

/// The classification triple, plus the stub strategy's finding regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Label from the closed set.
    pub cancer_type: TumorClass,
    /// Stage from the closed set.
    pub cancer_stage: Stage,
    /// Fixed per-rule constant in `[0, 1]` (rule-based) or a uniform
    /// sample from `[0.7, 1.0)` (stub).
    pub confidence: f64,
    /// Empty for the rule-based strategy.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<FindingRegion>,
}

impl Classification {
    /// A classification with no finding regions.
    const fn new(cancer_type: TumorClass, cancer_stage: Stage, confidence: f64) -> Self {
        Self {
            cancer_type,
            cancer_stage,
            confidence,
            regions: Vec::new(),
        }
    }
}

/// Selects which classification strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClassifierKind {
    /// Deterministic threshold ladder over the feature scalars.
    #[default]
    RuleBased,
    /// Random label/confidence/regions, independent of the image.
    Stub,
}

/// Trait for classification strategies.
///
/// Total over any well-formed [`FeatureSet`]: every strategy returns
/// a classification, never an error.
pub trait Classifier {
    /// Map a feature set to a classification.
    fn classify(&self, features: &FeatureSet) -> Classification;
}

impl Classifier for ClassifierKind {
    fn classify(&self, features: &FeatureSet) -> Classification {
        match *self {
            Self::RuleBased => rule_based(features),
            Self::Stub => stub(),
        }
    }
}

/// The deterministic rule ladder.
///
/// Rules are evaluated in a fixed priority order; the first match
/// wins. Threshold constants are those of the most complete reference
/// variant and are meaningful only as a demonstration, not as
/// diagnostic logic.
fn rule_based(features: &FeatureSet) -> Classification {
    let density = features.contour_density;
    let circularity = features.avg_circularity;
    let complexity = features.shape_complexity;
    let texture = features.texture_uniformity;
    let intensity = features.avg_intensity;

    // Sparse, smooth, uniform frame: nothing suspicious detected.
    if density < 0.1 && features.edge_density < 0.05 && texture > 0.8 {
        return Classification::new(TumorClass::HealthyPancreas, Stage::NotApplicable, 0.92);
    }

    if features.num_contours == 0 {
        return Classification::new(
            TumorClass::InsufficientFeatures,
            Stage::NotApplicable,
            0.95,
        );
    }

    if density > 0.4 {
        if circularity > 0.7 && complexity < 2.0 {
            Classification::new(TumorClass::NeuroendocrineTumor, Stage::StageIII, 0.85)
        } else if texture < 0.3 && intensity > 150.0 {
            Classification::new(TumorClass::MucinousCysticNeoplasm, Stage::StageII, 0.83)
        } else {
            Classification::new(TumorClass::DuctalAdenocarcinoma, Stage::StageII, 0.88)
        }
    } else if density > 0.2 {
        if circularity > 0.6 && complexity < 1.5 {
            Classification::new(TumorClass::AcinarCellCarcinoma, Stage::StageII, 0.82)
        } else if texture > 0.6 && intensity < 100.0 {
            Classification::new(
                TumorClass::IntraductalPapillaryMucinousNeoplasm,
                Stage::StageI,
                0.81,
            )
        } else {
            Classification::new(TumorClass::DuctalAdenocarcinoma, Stage::StageI, 0.87)
        }
    } else if circularity > 0.8 && complexity < 1.2 {
        Classification::new(TumorClass::SolidPseudopapillaryNeoplasm, Stage::StageI, 0.80)
    } else if texture < 0.4 && intensity > 120.0 {
        Classification::new(TumorClass::SerousCystadenoma, Stage::EarlyStage, 0.79)
    } else if complexity > 2.5 {
        Classification::new(TumorClass::AdenosquamousCarcinoma, Stage::StageII, 0.77)
    } else {
        Classification::new(
            TumorClass::EarlyStageAbnormality,
            Stage::EarlyDetection,
            0.75,
        )
    }
}

/// Labels the stub strategy samples from when it "finds" something.
const STUB_TYPES: [TumorClass; 3] = [
    TumorClass::DuctalAdenocarcinoma,
    TumorClass::NeuroendocrineTumor,
    TumorClass::AcinarCellCarcinoma,
];

/// Stages the stub strategy samples from.
const STUB_STAGES: [Stage; 3] = [Stage::StageI, Stage::StageII, Stage::StageIII];

/// The placeholder strategy: a coin flip, then uniform samples.
///
/// Matches the earliest reference prototype: confidence uniform in
/// `[0.7, 1.0)` and one random normalized finding region when the
/// coin lands on "abnormal". Never used on the tested path.
fn stub() -> Classification {
    let mut rng = rand::thread_rng();
    let confidence = rng.gen_range(0.7..1.0);

    if rng.gen_bool(0.5) {
        let cancer_type = STUB_TYPES
            .choose(&mut rng)
            .copied()
            .unwrap_or(TumorClass::DuctalAdenocarcinoma);
        let cancer_stage = STUB_STAGES.choose(&mut rng).copied().unwrap_or(Stage::StageI);
        let region = FindingRegion {
            x: rng.gen_range(0.0..0.8),
            y: rng.gen_range(0.0..0.8),
            width: rng.gen_range(0.1..0.3),
            height: rng.gen_range(0.1..0.3),
        };
        Classification {
            cancer_type,
            cancer_stage,
            confidence,
            regions: vec![region],
        }
    } else {
        Classification::new(TumorClass::HealthyPancreas, Stage::NotApplicable, confidence)
    }
}
