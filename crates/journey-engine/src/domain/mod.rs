//! Pure journey logic: view derivation and the progress reducer.

pub mod machine;
pub mod view;
