//! Tests for temporary-stack creation, growth, and finalization.

use cassino::game::MatchRules;
use cassino::game::engine::GameError;
use cassino::game::entities::{Card, CardOrigin, Suit};
use cassino::game::stacks::{augment_stack, create_stack, stack_to_build};

#[test]
fn larger_value_sits_at_the_bottom_regardless_of_drag_order() {
    let three = Card(3, Suit::Club);
    let seven = Card(7, Suit::Diamond);

    let dragged_small = create_stack(three, CardOrigin::Hand, seven, 0, false).unwrap();
    let dragged_large = create_stack(seven, CardOrigin::Hand, three, 0, false).unwrap();

    assert_eq!(dragged_small.cards[0], seven);
    assert_eq!(dragged_large.cards[0], seven);
    assert_eq!(dragged_small.value, 10);
    assert_eq!(dragged_large.value, 10);
}

#[test]
fn equal_values_keep_the_table_card_beneath() {
    let dragged = Card(5, Suit::Club);
    let target = Card(5, Suit::Diamond);

    let stack = create_stack(dragged, CardOrigin::Hand, target, 0, false).unwrap();
    assert_eq!(stack.cards, vec![target, dragged]);
    assert_eq!(stack.origins, vec![CardOrigin::Table, CardOrigin::Hand]);
}

#[test]
fn origins_run_parallel_to_cards() {
    let stack = create_stack(
        Card(2, Suit::Club),
        CardOrigin::Hand,
        Card(6, Suit::Diamond),
        1,
        false,
    )
    .unwrap();
    assert_eq!(stack.cards.len(), stack.origins.len());
    // The dragged 2 ends up on top, so its origin does too.
    assert_eq!(stack.origins, vec![CardOrigin::Table, CardOrigin::Hand]);
}

#[test]
fn face_cards_cannot_stage() {
    let err = create_stack(
        Card(12, Suit::Club),
        CardOrigin::Hand,
        Card(5, Suit::Diamond),
        0,
        false,
    )
    .unwrap_err();
    assert_eq!(err, GameError::FaceCardInCombination);

    let err = create_stack(
        Card(5, Suit::Diamond),
        CardOrigin::Hand,
        Card(11, Suit::Club),
        0,
        false,
    )
    .unwrap_err();
    assert_eq!(err, GameError::FaceCardInCombination);
}

#[test]
fn owner_build_status_controls_augmentation_rights() {
    let without = create_stack(
        Card(2, Suit::Club),
        CardOrigin::Hand,
        Card(3, Suit::Diamond),
        0,
        false,
    )
    .unwrap();
    let with = create_stack(
        Card(2, Suit::Heart),
        CardOrigin::Hand,
        Card(3, Suit::Spade),
        0,
        true,
    )
    .unwrap();
    assert!(!without.can_augment_builds);
    assert!(with.can_augment_builds);
}

#[test]
fn augment_grows_the_running_total() {
    let mut stack = create_stack(
        Card(2, Suit::Club),
        CardOrigin::Hand,
        Card(3, Suit::Diamond),
        0,
        false,
    )
    .unwrap();

    augment_stack(&mut stack, Card(4, Suit::Heart), CardOrigin::Table).unwrap();
    assert_eq!(stack.value, 9);
    assert_eq!(stack.cards.len(), 3);
    assert_eq!(stack.origins[2], CardOrigin::Table);

    // No upper bound while staging; the ceiling applies at commit.
    augment_stack(&mut stack, Card(9, Suit::Spade), CardOrigin::Hand).unwrap();
    assert_eq!(stack.value, 18);
}

#[test]
fn augment_rejects_face_cards() {
    let mut stack = create_stack(
        Card(2, Suit::Club),
        CardOrigin::Hand,
        Card(3, Suit::Diamond),
        0,
        false,
    )
    .unwrap();
    let err = augment_stack(&mut stack, Card(13, Suit::Heart), CardOrigin::Hand).unwrap_err();
    assert_eq!(err, GameError::FaceCardInCombination);
    assert_eq!(stack.value, 5);
}

#[test]
fn stack_commits_to_a_build_owned_by_its_creator() {
    let stack = create_stack(
        Card(6, Suit::Club),
        CardOrigin::Hand,
        Card(4, Suit::Diamond),
        1,
        false,
    )
    .unwrap();

    let build = stack_to_build(&stack, &MatchRules::default()).unwrap();
    assert_eq!(build.value, 10);
    assert_eq!(build.owner, 1);
    assert!(build.is_complete);
}

#[test]
fn overstacked_total_cannot_commit() {
    let mut stack = create_stack(
        Card(8, Suit::Club),
        CardOrigin::Hand,
        Card(7, Suit::Diamond),
        0,
        false,
    )
    .unwrap();
    let err = stack_to_build(&stack, &MatchRules::default()).unwrap_err();
    assert_eq!(err, GameError::BuildCeilingExceeded { ceiling: 10 });

    // Still a valid stack; the player can keep staging or cancel.
    augment_stack(&mut stack, Card(1, Suit::Heart), CardOrigin::Hand).unwrap();
    assert_eq!(stack.value, 16);
}
