//! Build lifecycle: structural analysis, extension eligibility, and the
//! mutations that grow a build.

use uuid::Uuid;

use super::engine::{GameError, MatchRules};
use super::entities::{Build, Card, CardValue, PlayerIndex};

/// Result of scanning a card list for "base" structure.
///
/// A base is one card whose value equals the sum of the remaining cards
/// (within the build ceiling). A base-supported build is locked at the
/// base's value and can't be extended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BuildAnalysis {
    pub has_base: bool,
    pub base_value: Option<CardValue>,
    pub is_single_combination: bool,
    pub is_extendable: bool,
}

/// Sum of the cards' build values. Face cards never belong in a build.
pub fn combination_value(cards: &[Card]) -> Result<CardValue, GameError> {
    cards.iter().try_fold(0u8, |total, card| {
        let value = card
            .build_value()
            .ok_or(GameError::FaceCardInCombination)?;
        Ok(total + value)
    })
}

/// Treat each card as a candidate base and test whether the rest sum to
/// its value. Any base makes the build non-extendable and (by
/// construction) not a single combination.
pub fn analyze_build_for_extension(cards: &[Card], rules: &MatchRules) -> BuildAnalysis {
    let mut base_value = None;
    for (idx, candidate) in cards.iter().enumerate() {
        let Some(value) = candidate.build_value() else {
            continue;
        };
        if value > rules.build_ceiling {
            continue;
        }
        let rest: CardValue = cards
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != idx)
            .filter_map(|(_, card)| card.build_value())
            .sum();
        if rest == value {
            base_value = Some(value);
            break;
        }
    }

    let has_base = base_value.is_some();
    let is_single_combination = !has_base;
    BuildAnalysis {
        has_base,
        base_value,
        is_single_combination,
        is_extendable: cards.len() < rules.max_build_cards && !has_base && is_single_combination,
    }
}

/// Construct a build from a committed card list. Value is the sum of the
/// cards, or the base value for base-supported builds.
pub fn new_build(
    cards: Vec<Card>,
    owner: PlayerIndex,
    rules: &MatchRules,
) -> Result<Build, GameError> {
    let sum = combination_value(&cards)?;
    let analysis = analyze_build_for_extension(&cards, rules);
    let value = analysis.base_value.unwrap_or(sum);
    if value > rules.build_ceiling {
        return Err(GameError::BuildCeilingExceeded {
            ceiling: rules.build_ceiling,
        });
    }
    Ok(Build {
        build_id: Uuid::new_v4(),
        cards,
        value,
        owner,
        is_extendable: analysis.is_extendable,
        has_base: analysis.has_base,
        is_single_combination: analysis.is_single_combination,
        is_complete: value == rules.completion_target,
    })
}

/// Whether `player` may extend this build. All four conditions must pass:
/// not the player's own build, under the card limit, no base structure,
/// and a single unambiguous combination.
pub fn can_build_be_extended(build: &Build, player: PlayerIndex) -> bool {
    build.owner != player && build.is_extendable
}

/// New value if `card` were added as an extension. Rejects sums over the
/// ceiling and cards with no build value.
pub fn validate_build_extension(
    build: &Build,
    card: Card,
    rules: &MatchRules,
) -> Result<CardValue, GameError> {
    let value = card
        .build_value()
        .ok_or(GameError::FaceCardInCombination)?;
    let new_value = build.value + value;
    if new_value > rules.build_ceiling {
        return Err(GameError::BuildCeilingExceeded {
            ceiling: rules.build_ceiling,
        });
    }
    Ok(new_value)
}

/// Apply a validated extension: the card list grows, the value adds the
/// extension card, ownership transfers to the extender, and eligibility
/// flags are recomputed from scratch against the new card list.
pub fn apply_extension(
    build: &mut Build,
    card: Card,
    extender: PlayerIndex,
    rules: &MatchRules,
) -> Result<CardValue, GameError> {
    let new_value = validate_build_extension(build, card, rules)?;
    build.cards.push(card);
    build.value = new_value;
    build.owner = extender;
    let analysis = analyze_build_for_extension(&build.cards, rules);
    build.has_base = analysis.has_base;
    build.is_single_combination = analysis.is_single_combination;
    build.is_extendable = analysis.is_extendable;
    build.is_complete = new_value == rules.completion_target;
    Ok(new_value)
}

/// Merge an equal-valued combination into an existing build. The value
/// is untouched; the build now holds multiple combinations and is no
/// longer extendable.
pub fn apply_augmentation(build: &mut Build, cards: &[Card]) {
    build.cards.extend_from_slice(cards);
    build.is_single_combination = false;
    build.is_extendable = false;
}
