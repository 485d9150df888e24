//! Turns desired flag state into JSON Patch operations.
//!
//! Variations are addressed by position: targeting rules reference them by index. Existing
//! positions are only ever replaced in place, extra ones are removed from the tail and new ones
//! appended at the tail. Reordering variations is therefore expressed as value replacements and
//! does not move anything referencing a position.
use crate::{
    resources::{TargetingRule, Variation},
    wire::{JsonVariation, PatchOperation},
    Error, Result,
};

/// Index served by default-on rules when the flag declares no variations.
const LEGACY_DEFAULT_ON_INDEX: usize = 1;
const LEGACY_DEFAULT_OFF_INDEX: usize = 0;

/// Compute the patch batches moving a flag from `current_len` variations to `desired`.
///
/// Each batch must be sent as its own `PATCH`, in order. Empty batches are omitted.
///
/// - Shrinking: one batch removing trailing variations from the highest index down, then one
///   batch replacing value, name and description of every remaining position.
/// - Growing (or same size): one batch replacing every existing position, then one batch
///   appending the new variations.
pub fn variation_patch_batches(
    desired: &[JsonVariation],
    current_len: usize,
) -> Result<Vec<Vec<PatchOperation>>> {
    let mut batches = Vec::new();

    if desired.len() < current_len {
        let removals = (desired.len()..current_len)
            .rev()
            .map(|index| PatchOperation::remove(format!("/variations/{index}")))
            .collect();
        batches.push(removals);
        batches.push(replace_variations(desired)?);
    } else {
        batches.push(replace_variations(&desired[..current_len])?);
        let additions = desired[current_len..]
            .iter()
            .enumerate()
            .map(|(offset, variation)| {
                Ok(PatchOperation::add(
                    format!("/variations/{}", current_len + offset),
                    serde_json::to_value(variation)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        batches.push(additions);
    }

    batches.retain(|batch| !batch.is_empty());
    Ok(batches)
}

fn replace_variations(variations: &[JsonVariation]) -> Result<Vec<PatchOperation>> {
    let mut operations = Vec::with_capacity(variations.len() * 3);
    for (index, variation) in variations.iter().enumerate() {
        operations.push(PatchOperation::replace(
            format!("/variations/{index}/value"),
            serde_json::to_value(&variation.value)?,
        ));
        operations.push(PatchOperation::replace(
            format!("/variations/{index}/name"),
            variation.name.clone(),
        ));
        operations.push(PatchOperation::replace(
            format!("/variations/{index}/description"),
            variation.description.clone(),
        ));
    }
    Ok(operations)
}

/// Position of the first variation whose value is exactly `value`.
pub fn variation_index(variations: &[Variation], value: &str) -> Result<usize> {
    variations
        .iter()
        .position(|variation| variation.value == value)
        .ok_or_else(|| Error::InvalidVariationValue {
            value: value.to_owned(),
        })
}

/// Variation served by the default-on ("fallthrough") rule.
///
/// An empty `value` selects the last variation. A flag without declared variations always gets
/// index 1, which is what older releases sent and what existing flags rely on.
pub fn default_variation_index(variations: &[Variation], value: &str) -> Result<usize> {
    if variations.is_empty() {
        return Ok(LEGACY_DEFAULT_ON_INDEX);
    }
    if value.is_empty() {
        return Ok(variations.len() - 1);
    }
    variation_index(variations, value)
}

/// Variation served when targeting is off. An empty `value` selects the last variation.
pub fn default_off_variation_index(variations: &[Variation], value: &str) -> Result<usize> {
    if variations.is_empty() {
        return Ok(LEGACY_DEFAULT_OFF_INDEX);
    }
    if value.is_empty() {
        return Ok(variations.len() - 1);
    }
    variation_index(variations, value)
}

/// One `replace` of the fallthrough variation per rule.
pub fn default_targeting_patch(
    rules: &[TargetingRule],
    variations: &[Variation],
) -> Result<Vec<PatchOperation>> {
    rules
        .iter()
        .map(|rule| {
            let index = default_variation_index(variations, &rule.value)?;
            Ok(PatchOperation::replace(
                format!("/environments/{}/fallthrough/variation", rule.environment),
                index,
            ))
        })
        .collect()
}

/// One `replace` of the off variation per rule.
pub fn default_off_targeting_patch(
    rules: &[TargetingRule],
    variations: &[Variation],
) -> Result<Vec<PatchOperation>> {
    rules
        .iter()
        .map(|rule| {
            let index = default_off_variation_index(variations, &rule.value)?;
            Ok(PatchOperation::replace(
                format!("/environments/{}/offVariation", rule.environment),
                index,
            ))
        })
        .collect()
}
