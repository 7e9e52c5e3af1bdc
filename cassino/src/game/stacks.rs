//! Temporary-stack lifecycle: the staging area between a drag and a
//! committed capture or build.

use uuid::Uuid;

use super::builds;
use super::engine::{GameError, MatchRules};
use super::entities::{Build, Card, CardOrigin, PlayerIndex, TemporaryStack};

/// Combine a dragged card with a loose table card into a new stack.
///
/// Ordering is deterministic: the larger-value card sits at index 0 (the
/// bottom) regardless of drag order; on equal values the table card stays
/// beneath. `owner_has_build` decides whether the stack may later augment
/// a build.
pub fn create_stack(
    dragged: Card,
    dragged_origin: CardOrigin,
    target: Card,
    owner: PlayerIndex,
    owner_has_build: bool,
) -> Result<TemporaryStack, GameError> {
    let dragged_value = dragged
        .build_value()
        .ok_or(GameError::FaceCardInCombination)?;
    let target_value = target
        .build_value()
        .ok_or(GameError::FaceCardInCombination)?;

    let (cards, origins) = if dragged_value > target_value {
        (
            vec![dragged, target],
            vec![dragged_origin, CardOrigin::Table],
        )
    } else {
        (
            vec![target, dragged],
            vec![CardOrigin::Table, dragged_origin],
        )
    };

    Ok(TemporaryStack {
        stack_id: Uuid::new_v4(),
        cards,
        origins,
        owner,
        value: dragged_value + target_value,
        can_augment_builds: owner_has_build,
    })
}

/// Append a card to the stack and grow its running total. There is no
/// upper bound at this layer; bound checks belong to capture and build
/// finalization.
pub fn augment_stack(
    stack: &mut TemporaryStack,
    card: Card,
    origin: CardOrigin,
) -> Result<(), GameError> {
    let value = card
        .build_value()
        .ok_or(GameError::FaceCardInCombination)?;
    stack.cards.push(card);
    stack.origins.push(origin);
    stack.value += value;
    Ok(())
}

/// Finalize a stack into a build owned by its creator. The staged total
/// must respect the build ceiling; the card list is then re-analyzed for
/// extension structure.
pub fn stack_to_build(stack: &TemporaryStack, rules: &MatchRules) -> Result<Build, GameError> {
    if stack.value > rules.build_ceiling {
        return Err(GameError::BuildCeilingExceeded {
            ceiling: rules.build_ceiling,
        });
    }
    builds::new_build(stack.cards.clone(), stack.owner, rules)
}
