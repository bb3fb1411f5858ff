//! Subcommand implementations, one module per platform domain.

pub mod inventory;
pub mod issues;
pub mod locations;
pub mod mboms;
pub mod procedures;
pub mod purchases;
pub mod roles;
pub mod rules;
pub mod runs;
pub mod teams;

use fabops_core::EntityId;

/// Ids in CSV input may be the platform's integer ids or opaque strings.
pub(crate) fn parse_entity_id(raw: &str) -> EntityId {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map(EntityId::Int)
        .unwrap_or_else(|_| EntityId::from(trimmed))
}
