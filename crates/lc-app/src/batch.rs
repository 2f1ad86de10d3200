use std::path::PathBuf;

use lc_core::Predictor;
use lc_core::config::ClassifierConfig;
use rayon::prelude::*;

use crate::pipeline::classify_file;
use crate::report::Outcome;

/// Classe plusieurs fichiers en parallèle.
///
/// Le modèle est partagé en lecture seule entre les threads. Chaque fichier a
/// son propre résultat : un échec n'interrompt pas les autres. L'ordre de
/// sortie est celui des entrées.
#[must_use]
pub fn run_batch(
    inputs: &[PathBuf],
    predictor: &dyn Predictor,
    config: &ClassifierConfig,
) -> Vec<Outcome> {
    let work = || -> Vec<Outcome> {
        inputs
            .par_iter()
            .map(|path| {
                let outcome = classify_file(path, predictor, config);
                if let Err(ref e) = outcome {
                    log::warn!("{} : {e:#}", path.display());
                }
                outcome
            })
            .collect()
    };

    if config.jobs == 0 {
        return work();
    }
    match rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
    {
        Ok(pool) => pool.install(work),
        Err(e) => {
            log::warn!("Pool de {} threads indisponible ({e}), pool global utilisé", config.jobs);
            work()
        }
    }
}
