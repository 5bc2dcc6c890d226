/// Confusion counts and scores for good/bad classifications
pub mod confusion;
