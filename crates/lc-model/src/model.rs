use lc_core::error::ModelError;
use lc_core::features::{FEATURE_COUNT, FeatureVector};
use lc_core::traits::Predictor;
use serde::{Deserialize, Serialize};

/// Régresseur de sonie pré-entraîné, tel qu'exporté depuis l'outil d'entraînement.
///
/// # Example
/// ```
/// use lc_model::model::{LinearModel, LoudnessModel};
/// use lc_core::{FeatureVector, Predictor};
///
/// let model = LoudnessModel::Linear(LinearModel {
///     coefficients: [1.0, 0.0, 0.0, 0.0],
///     intercept: 0.1,
/// });
/// let y = model.predict(&FeatureVector::new(0.5, -20.0, 0.1, 100.0)).unwrap();
/// assert!((y - 0.6).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoudnessModel {
    Linear(LinearModel),
    Forest(RandomForest),
    Boosted(BoostedTrees),
}

/// `intercept + Σ coefficients[j] · x[j]`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LinearModel {
    pub coefficients: [f64; FEATURE_COUNT],
    pub intercept: f64,
}

/// Moyenne des sorties des arbres (random forest, bagging).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RandomForest {
    pub trees: Vec<RegressionTree>,
}

/// `init + learning_rate · Σ arbres` (gradient boosting).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BoostedTrees {
    pub init: f64,
    pub learning_rate: f64,
    pub trees: Vec<RegressionTree>,
}

/// Arbre de régression à plat ; le nœud 0 est la racine.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes to `left`, anything else (NaN included) to `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl RegressionTree {
    /// Descend depuis la racine jusqu'à une feuille.
    ///
    /// # Errors
    /// Returns [`ModelError::Invalid`] on a dangling index or a cycle.
    pub fn evaluate(&self, x: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError> {
        let mut idx = 0;
        // Un arbre valide atteint une feuille en au plus `nodes.len()` pas.
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let v = x.get(*feature).copied().unwrap_or(f64::NAN);
                    idx = if v <= *threshold { *left } else { *right };
                }
                None => break,
            }
        }
        Err(ModelError::Invalid(format!("arbre mal formé (nœud {idx})")))
    }

    /// Vérifie les bornes, l'ordre topologique et la finitude des valeurs.
    ///
    /// # Errors
    /// Returns [`ModelError::Invalid`] describing the first defect found.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Invalid("arbre vide".into()));
        }
        let len = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Leaf { value } if !value.is_finite() => {
                    return Err(ModelError::Invalid(format!("feuille {i} non finie : {value}")));
                }
                TreeNode::Leaf { .. } => {}
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_COUNT {
                        return Err(ModelError::Invalid(format!(
                            "nœud {i} : feature {feature} hors bornes (< {FEATURE_COUNT})"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::Invalid(format!("nœud {i} : seuil non fini")));
                    }
                    for child in [left, right] {
                        if child <= i || child >= len {
                            return Err(ModelError::Invalid(format!(
                                "nœud {i} : enfant {child} invalide ({len} nœuds)"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn validate_trees(trees: &[RegressionTree]) -> Result<(), ModelError> {
    if trees.is_empty() {
        return Err(ModelError::Invalid("ensemble sans arbre".into()));
    }
    for (i, tree) in trees.iter().enumerate() {
        tree.validate().map_err(|e| match e {
            ModelError::Invalid(msg) => ModelError::Invalid(format!("arbre {i} : {msg}")),
            other => other,
        })?;
    }
    Ok(())
}

fn sum_trees(trees: &[RegressionTree], x: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError> {
    trees.iter().try_fold(0.0, |acc, t| Ok(acc + t.evaluate(x)?))
}

impl LoudnessModel {
    /// Validate structure and numbers once, right after loading.
    ///
    /// # Errors
    /// Returns [`ModelError::Invalid`] if the model cannot be evaluated safely.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::Linear(m) => {
                if m.coefficients.iter().chain([&m.intercept]).all(|v| v.is_finite()) {
                    Ok(())
                } else {
                    Err(ModelError::Invalid("coefficients non finis".into()))
                }
            }
            Self::Forest(f) => validate_trees(&f.trees),
            Self::Boosted(b) => {
                if !b.init.is_finite() || !b.learning_rate.is_finite() {
                    return Err(ModelError::Invalid("init/learning_rate non finis".into()));
                }
                validate_trees(&b.trees)
            }
        }
    }

    /// Short description for logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Linear(_) => "linear".to_string(),
            Self::Forest(f) => format!("forest ({} arbres)", f.trees.len()),
            Self::Boosted(b) => format!("boosted ({} arbres, lr {})", b.trees.len(), b.learning_rate),
        }
    }

    fn evaluate(&self, x: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError> {
        match self {
            Self::Linear(m) => Ok(m.intercept
                + m.coefficients
                    .iter()
                    .zip(x)
                    .map(|(c, v)| c * v)
                    .sum::<f64>()),
            Self::Forest(f) => {
                if f.trees.is_empty() {
                    return Err(ModelError::Invalid("ensemble sans arbre".into()));
                }
                Ok(sum_trees(&f.trees, x)? / f.trees.len() as f64)
            }
            Self::Boosted(b) => Ok(b.init + b.learning_rate * sum_trees(&b.trees, x)?),
        }
    }
}

impl Predictor for LoudnessModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let y = self.evaluate(features.as_array())?;
        if y.is_finite() {
            Ok(y)
        } else {
            Err(ModelError::NonFinite(y))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stump on `feature`: `<= threshold` → `lo`, else `hi`.
    fn stump(feature: usize, threshold: f64, lo: f64, hi: f64) -> RegressionTree {
        RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: lo },
                TreeNode::Leaf { value: hi },
            ],
        }
    }

    fn fv(peak: f64, db: f64) -> FeatureVector {
        FeatureVector::new(peak, db, 0.1, 4000.0)
    }

    #[test]
    fn linear_dot_product() {
        let model = LoudnessModel::Linear(LinearModel {
            coefficients: [0.5, 0.01, -1.0, 0.0],
            intercept: 0.2,
        });
        let y = model.predict(&FeatureVector::new(0.4, -20.0, 0.1, 123.0)).unwrap();
        assert!((y - (0.2 + 0.2 - 0.2 - 0.1)).abs() < 1e-12);
    }

    #[test]
    fn forest_averages_trees() {
        let model = LoudnessModel::Forest(RandomForest {
            trees: vec![stump(0, 0.5, 0.0, 1.0), stump(1, -30.0, 0.0, 0.5)],
        });
        model.validate().unwrap();
        assert!((model.predict(&fv(0.9, -10.0)).unwrap() - 0.75).abs() < 1e-12);
        assert!((model.predict(&fv(0.1, -10.0)).unwrap() - 0.25).abs() < 1e-12);
        assert!(model.predict(&fv(0.1, -40.0)).unwrap().abs() < 1e-12);
    }

    #[test]
    fn split_threshold_is_inclusive_left() {
        let tree = stump(0, 0.5, -1.0, 1.0);
        assert_eq!(tree.evaluate(&[0.5, 0.0, 0.0, 0.0]).unwrap(), -1.0);
        assert_eq!(tree.evaluate(&[f64::NAN, 0.0, 0.0, 0.0]).unwrap(), 1.0);
    }

    #[test]
    fn boosted_scales_sum() {
        let model = LoudnessModel::Boosted(BoostedTrees {
            init: 0.1,
            learning_rate: 0.5,
            trees: vec![stump(0, 0.5, 0.0, 0.2), stump(0, 0.5, 0.0, 0.2)],
        });
        assert!((model.predict(&fv(0.9, 0.0)).unwrap() - 0.3).abs() < 1e-12);
        assert!((model.predict(&fv(0.1, 0.0)).unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn rejects_out_of_range_feature() {
        let model = LoudnessModel::Forest(RandomForest {
            trees: vec![stump(4, 0.0, 0.0, 1.0)],
        });
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("feature 4"));
    }

    #[test]
    fn rejects_backward_edges() {
        let tree = RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 1,
                },
                TreeNode::Leaf { value: 0.0 },
            ],
        };
        assert!(tree.validate().is_err());
        // sans validation, l'évaluation s'arrête quand même
        assert!(tree.evaluate(&[-1.0, 0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn rejects_empty_ensembles() {
        let model = LoudnessModel::Forest(RandomForest { trees: vec![] });
        assert!(model.validate().is_err());
        assert!(model.predict(&fv(0.0, 0.0)).is_err());
    }

    #[test]
    fn non_finite_output_is_an_error() {
        let model = LoudnessModel::Linear(LinearModel {
            coefficients: [f64::MAX, f64::MAX, 0.0, 0.0],
            intercept: 0.0,
        });
        assert!(matches!(
            model.predict(&FeatureVector::new(10.0, 10.0, 0.0, 0.0)),
            Err(ModelError::NonFinite(_))
        ));
    }
}
