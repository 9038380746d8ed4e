//! Protocol method grouping
//!
//! Members that implement a protocol declared in the same module are nested
//! under that protocol's record instead of appearing at the top level.

use crate::host::{Member, MemberId, ModuleId};

/// Whether `member` belongs to a protocol that is itself among `publics`.
///
/// A method whose protocol lives elsewhere is an ordinary top-level member.
pub fn is_protocol_method(member: &Member, module: &ModuleId, publics: &[Member]) -> bool {
    member
        .meta
        .protocol
        .as_ref()
        .is_some_and(|owner| publics.iter().any(|p| &p.id(module) == owner))
}

/// Members of `candidates` whose declared owner is `protocol`.
pub fn protocol_methods<'m>(
    protocol: &MemberId,
    candidates: &[&'m Member],
) -> Vec<&'m Member> {
    candidates
        .iter()
        .copied()
        .filter(|m| m.meta.protocol.as_ref() == Some(protocol))
        .collect()
}
