//! Member kind classification

use crate::host::{Member, RuntimeValue};
use crate::types::MemberKind;

/// Classify a loaded member.
///
/// Checks run in a fixed order and the first match wins: macro, then
/// multimethod, then protocol, falling back to a plain value.
pub fn classify(member: &Member) -> MemberKind {
    if is_macro(member) {
        MemberKind::Macro
    } else if is_multimethod(member) {
        MemberKind::Multimethod
    } else if is_protocol(member) {
        MemberKind::Protocol
    } else {
        MemberKind::Value
    }
}

fn is_macro(member: &Member) -> bool {
    member.meta.is_macro
}

fn is_multimethod(member: &Member) -> bool {
    matches!(member.value, RuntimeValue::MultiFn)
}

/// Protocol descriptors are unsorted maps holding an interface handle.
///
/// Sorted maps are excluded outright: some sorted map implementations answer
/// key lookups for keys they do not hold.
fn is_protocol(member: &Member) -> bool {
    match &member.value {
        RuntimeValue::Map { sorted: false, keys } => {
            keys.iter().any(|k| k == RuntimeValue::INTERFACE_KEY)
        }
        _ => false,
    }
}
