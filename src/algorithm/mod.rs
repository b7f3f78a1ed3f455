/// Agglomerative clustering of rows into a binary tree
pub mod builder;
/// Pairwise row distances and metrics
pub mod distance;
/// Build, reorder and validate pipeline
pub mod executor;
/// Optimal leaf ordering via endpoint cost tables
pub mod optimal;
/// Strategy selection, scoring guard and the local heuristic
pub mod ordering;
/// Leaf order flattening and adjacency scoring
pub mod score;
/// Structural integrity checks
pub mod validator;
