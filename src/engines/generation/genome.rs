use super::gene::Gene;

/// Genome representation for the digit layout
///
/// A genome is the ordered list of placed digits of one candidate layout.
/// Every genome of one run has the same length (`size_of_genom`).
///
/// Gene order has no influence on the rendered frames; it is kept so that
/// a mutation index or a persisted winner refers to the same digit on every
/// replay.
///
/// # Persistence
///
/// A genome serializes as a JSON list of gene tuples:
///
/// ```text
/// [[3, -1200, 400, 8800, 2100, 275], [7, 0, -300, 11000, 600, 12], ...]
/// ```
pub type Genome = Vec<Gene>;
