//! Flutter bridge surface for the Todolime core.

pub mod api;
