pub mod comparison;
pub mod dossier;
