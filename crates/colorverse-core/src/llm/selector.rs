//! Model candidate ordering
//!
//! Biases toward models that have recently worked for a provider while still
//! leaving room to explore the rest of the catalog. Tie-breaking is
//! deterministic: registry order decides between equal success counts.

use crate::llm::registry::ProviderDescriptor;
use crate::llm::status::ProviderStatusTracker;

/// Upper bound on candidates tried per provider
pub const MAX_MODEL_CANDIDATES: usize = 5;

/// Ordered model candidates for a provider.
///
/// Models with a recorded success come first, descending by success count;
/// the remaining registry models follow in registry order. The result is
/// capped at [`MAX_MODEL_CANDIDATES`].
pub fn select_models(descriptor: &ProviderDescriptor, tracker: &ProviderStatusTracker) -> Vec<String> {
    let counts = tracker.model_success_counts(descriptor.id);

    let mut proven: Vec<(usize, &str, u32)> = descriptor
        .models
        .iter()
        .enumerate()
        .filter_map(|(index, model)| {
            counts
                .get(*model)
                .copied()
                .filter(|count| *count > 0)
                .map(|count| (index, *model, count))
        })
        .collect();
    proven.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));

    let mut ordered: Vec<String> = proven
        .iter()
        .map(|(_, model, _)| (*model).to_string())
        .collect();
    for model in descriptor.models {
        if !counts.get(*model).is_some_and(|count| *count > 0) {
            ordered.push((*model).to_string());
        }
    }

    ordered.truncate(MAX_MODEL_CANDIDATES);
    ordered
}
