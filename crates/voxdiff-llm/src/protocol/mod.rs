//! Wire format types for upstream providers

pub mod google;
