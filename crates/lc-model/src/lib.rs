// Predictive models behind the `Predictor` seam, and their on-disk formats.

pub mod io;
pub mod model;

pub use io::{ModelFormat, load_model, save_model};
pub use model::{BoostedTrees, LinearModel, LoudnessModel, RandomForest, RegressionTree, TreeNode};
