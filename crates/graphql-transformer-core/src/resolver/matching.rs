//! Recognizing overrides among the units of a slot.
//!
//! Generated units name their templates after their position, e.g.
//! `Query.getPost.{slotName}.{slotIndex}.req.vtl`, and user provided override files use the
//! resolved form `Query.getPost.auth.1.req.vtl`. An incoming unit overrides an existing one when
//! their names agree once placeholders are substituted and extensions stripped.

use super::{FunctionLogic, FunctionUnit, function_unit::substitute_placeholders};

const EXTENSIONS: &[&str] = &[".req.vtl", ".res.vtl", ".js"];

/// The position of the unit `incoming` overrides in `units`, if any.
pub(super) fn find_override(units: &[FunctionUnit], incoming: &FunctionUnit, slot_name: &str) -> Option<usize> {
    let keyed = incoming
        .key
        .as_ref()
        .and_then(|key| units.iter().position(|unit| unit.key.as_ref() == Some(key)));

    if keyed.is_some() {
        return keyed;
    }

    let incoming_names = incoming.logic.names();

    if incoming_names.iter().all(Option::is_none)
        || incoming_names.iter().flatten().any(|name| name.contains("{slotIndex}"))
    {
        return None;
    }

    // The position advances for every unit of the slot, including inline ones that can never be
    // matched.
    units.iter().enumerate().position(|(idx, unit)| {
        if incoming.key.is_some() && unit.key.is_some() {
            return false;
        }

        let slot_index = idx + 1;
        let [request, response] = normalized_names(&unit.logic, slot_name, slot_index);

        if request.is_none() && response.is_none() {
            return false;
        }

        let [incoming_request, incoming_response] = normalized_names(&incoming.logic, slot_name, slot_index);

        if same_kind(&unit.logic, &incoming.logic) {
            (request.is_some() && request == incoming_request) || (response.is_some() && response == incoming_response)
        } else {
            [incoming_request, incoming_response]
                .into_iter()
                .flatten()
                .any(|name| request.as_ref() == Some(&name) || response.as_ref() == Some(&name))
        }
    })
}

fn same_kind(a: &FunctionLogic, b: &FunctionLogic) -> bool {
    a.is_code() == b.is_code()
}

fn normalized_names(logic: &FunctionLogic, slot_name: &str, slot_index: usize) -> [Option<String>; 2] {
    logic
        .names()
        .map(|name| name.map(|name| normalize(name, slot_name, slot_index)))
}

pub(super) fn normalize(name: &str, slot_name: &str, slot_index: usize) -> String {
    let mut name = substitute_placeholders(name, slot_name, slot_index);

    if let Some(extension) = EXTENSIONS.iter().find(|extension| name.ends_with(**extension)) {
        name.truncate(name.len() - extension.len());
    }

    name
}
