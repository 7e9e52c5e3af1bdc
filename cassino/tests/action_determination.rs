//! Tests for the action-determination engine: mapping drops onto table
//! objects to candidate actions.

use cassino::contact::{ContactData, ContactKind, ContactPosition};
use cassino::game::MatchRules;
use cassino::game::actions::{
    Action, CaptureSource, CaptureTarget, DragSource, OptionKind, determine_action_from_contact,
    determine_actions,
};
use cassino::game::builds::new_build;
use cassino::game::entities::{
    Build, BuildId, Card, CardOrigin, GameState, LooseCard, StackId, Suit, TableItem,
};
use cassino::game::stacks::create_stack;

fn rules() -> MatchRules {
    MatchRules::default()
}

fn loose(card: Card) -> TableItem {
    TableItem::LooseCard(LooseCard { card })
}

fn card_contact(card: Card) -> ContactPosition {
    ContactPosition {
        id: format!("card-{card}"),
        x: 0.0,
        y: 0.0,
        width: 40.0,
        height: 60.0,
        kind: ContactKind::Card,
        data: ContactData::Card { card },
    }
}

fn build_contact(build_id: BuildId) -> ContactPosition {
    ContactPosition {
        id: format!("build-{build_id}"),
        x: 0.0,
        y: 0.0,
        width: 40.0,
        height: 60.0,
        kind: ContactKind::Build,
        data: ContactData::Build { build_id },
    }
}

fn stack_contact(stack_id: StackId) -> ContactPosition {
    ContactPosition {
        id: format!("stack-{stack_id}"),
        x: 0.0,
        y: 0.0,
        width: 40.0,
        height: 60.0,
        kind: ContactKind::TempStack,
        data: ContactData::Stack { stack_id },
    }
}

fn state_with_build(build: Build) -> (GameState, BuildId) {
    let build_id = build.build_id;
    let mut state = GameState::default();
    state.table_cards.push(TableItem::Build(build));
    (state, build_id)
}

// ============================================================================
// Open table area (no contact)
// ============================================================================

#[test]
fn open_area_drop_offers_a_trail_behind_a_modal() {
    let state = GameState::default();
    let plan = determine_actions(
        Card(7, Suit::Club),
        None,
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );

    assert_eq!(plan.options.len(), 1);
    assert!(plan.requires_modal);
    assert_eq!(plan.options[0].kind, OptionKind::Trail);
    assert_eq!(
        plan.options[0].action,
        Action::Trail {
            card: Card(7, Suit::Club)
        }
    );
}

#[test]
fn open_area_drop_is_rejected_off_turn() {
    let mut state = GameState::default();
    state.current_player = 1;

    let plan = determine_actions(
        Card(7, Suit::Club),
        None,
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );
    assert!(plan.options.is_empty());
    assert!(plan.error_message.is_some());
}

#[test]
fn table_cards_cannot_trail() {
    let state = GameState::default();
    let plan = determine_actions(
        Card(7, Suit::Club),
        None,
        &state,
        0,
        DragSource::Table,
        &rules(),
    );
    assert!(plan.options.is_empty());
    assert!(plan.error_message.is_some());
}

// ============================================================================
// Loose card contacts
// ============================================================================

#[test]
fn equal_values_offer_capture_and_staging_behind_a_modal() {
    let mut state = GameState::default();
    state.table_cards.push(loose(Card(5, Suit::Diamond)));
    state.table_cards.push(loose(Card(3, Suit::Heart)));

    let plan = determine_actions(
        Card(5, Suit::Club),
        Some(&card_contact(Card(5, Suit::Diamond))),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );

    assert_eq!(plan.options.len(), 2);
    assert!(plan.requires_modal);
    assert_eq!(plan.options[0].kind, OptionKind::Capture);
    assert_eq!(plan.options[1].kind, OptionKind::Build);
}

#[test]
fn capture_option_sweeps_every_matching_loose_card() {
    let mut state = GameState::default();
    state.table_cards.push(loose(Card(5, Suit::Diamond)));
    state.table_cards.push(loose(Card(5, Suit::Heart)));
    state.table_cards.push(loose(Card(2, Suit::Spade)));

    let plan = determine_actions(
        Card(5, Suit::Club),
        Some(&card_contact(Card(5, Suit::Diamond))),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );

    let capture = plan
        .options
        .iter()
        .find(|o| o.kind == OptionKind::Capture)
        .unwrap();
    let Action::Capture { captured, .. } = &capture.action else {
        panic!("expected a capture action");
    };
    assert_eq!(captured.len(), 2);
}

#[test]
fn different_values_offer_staging_only_without_a_modal() {
    let mut state = GameState::default();
    state.table_cards.push(loose(Card(5, Suit::Diamond)));

    let plan = determine_actions(
        Card(2, Suit::Club),
        Some(&card_contact(Card(5, Suit::Diamond))),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );

    assert_eq!(plan.options.len(), 1);
    assert!(!plan.requires_modal);
    assert_eq!(plan.options[0].kind, OptionKind::Build);
    assert_eq!(
        plan.options[0].action,
        Action::HandToTableDrop {
            card: Card(2, Suit::Club),
            target: Card(5, Suit::Diamond),
        }
    );
}

#[test]
fn face_card_pairs_with_an_equal_rank() {
    let mut state = GameState::default();
    state.table_cards.push(loose(Card(13, Suit::Diamond)));

    let plan = determine_actions(
        Card(13, Suit::Club),
        Some(&card_contact(Card(13, Suit::Diamond))),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );

    assert_eq!(plan.options.len(), 1);
    assert_eq!(plan.options[0].kind, OptionKind::Capture);
    assert_eq!(
        plan.options[0].action,
        Action::Capture {
            source: CaptureSource::Hand {
                card: Card(13, Suit::Club)
            },
            captured: vec![CaptureTarget::Loose {
                card: Card(13, Suit::Diamond)
            }],
        }
    );
}

#[test]
fn stale_card_contact_is_rejected() {
    let state = GameState::default();
    let plan = determine_actions(
        Card(5, Suit::Club),
        Some(&card_contact(Card(5, Suit::Diamond))),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );
    assert!(plan.options.is_empty());
    assert!(plan.error_message.is_some());
}

// ============================================================================
// Build contacts
// ============================================================================

#[test]
fn opponent_build_offers_extension() {
    let build = new_build(vec![Card(2, Suit::Club), Card(4, Suit::Diamond)], 1, &rules()).unwrap();
    let (state, build_id) = state_with_build(build);

    let plan = determine_actions(
        Card(3, Suit::Heart),
        Some(&build_contact(build_id)),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );

    assert_eq!(plan.options.len(), 1);
    assert_eq!(plan.options[0].kind, OptionKind::ExtendBuild);
    let Action::ExtendBuild { card, .. } = plan.options[0].action else {
        panic!("expected an extension");
    };
    assert_eq!(card, Card(3, Suit::Heart));
}

#[test]
fn extension_offers_a_merge_when_the_player_owns_the_target_value() {
    let extendable =
        new_build(vec![Card(2, Suit::Club), Card(4, Suit::Diamond)], 1, &rules()).unwrap();
    let own_nine =
        new_build(vec![Card(4, Suit::Spade), Card(5, Suit::Heart)], 0, &rules()).unwrap();
    let own_nine_id = own_nine.build_id;
    let (mut state, extendable_id) = state_with_build(extendable);
    state.table_cards.push(TableItem::Build(own_nine));

    // Extending 6 with a 3 lands on 9, the value of the player's own build.
    let plan = determine_actions(
        Card(3, Suit::Heart),
        Some(&build_contact(extendable_id)),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );

    assert_eq!(plan.options.len(), 2);
    assert!(plan.requires_modal);
    assert_eq!(plan.options[0].kind, OptionKind::ExtendBuild);
    assert_eq!(plan.options[1].kind, OptionKind::ReinforceBuild);
    assert_eq!(
        plan.options[1].action,
        Action::ReinforceBuild {
            build_id: own_nine_id,
            from_build_id: extendable_id,
            card: Card(3, Suit::Heart),
        }
    );
}

#[test]
fn matching_hand_card_captures_an_opponent_build() {
    let build = new_build(vec![Card(2, Suit::Club), Card(4, Suit::Diamond)], 1, &rules()).unwrap();
    let (state, build_id) = state_with_build(build);

    // 6 + 6 busts the ceiling, so capture is the only option.
    let plan = determine_actions(
        Card(6, Suit::Heart),
        Some(&build_contact(build_id)),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );

    assert_eq!(plan.options.len(), 1);
    assert_eq!(plan.options[0].kind, OptionKind::Capture);
}

#[test]
fn a_table_card_cannot_capture_an_opponent_build() {
    let build = new_build(vec![Card(2, Suit::Club), Card(4, Suit::Diamond)], 1, &rules()).unwrap();
    let (mut state, build_id) = state_with_build(build);
    state.table_cards.push(loose(Card(6, Suit::Heart)));

    // Extending 6 with a 6 busts the ceiling, and a loose table card
    // can't consume the build either: the drop has no legal move.
    let plan = determine_actions(
        Card(6, Suit::Heart),
        Some(&build_contact(build_id)),
        &state,
        0,
        DragSource::Table,
        &rules(),
    );

    assert!(plan.options.is_empty());
    assert!(plan.error_message.is_some());
}

#[test]
fn own_build_offers_augmentation_even_off_turn() {
    let build = new_build(vec![Card(2, Suit::Club), Card(4, Suit::Diamond)], 0, &rules()).unwrap();
    let (mut state, build_id) = state_with_build(build);
    state.current_player = 1;

    let plan = determine_actions(
        Card(3, Suit::Heart),
        Some(&build_contact(build_id)),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );
    assert_eq!(plan.options.len(), 1);
    assert!(matches!(
        plan.options[0].action,
        Action::AddToOwnBuild { .. }
    ));

    let action = determine_action_from_contact(
        Card(3, Suit::Heart),
        &build_contact(build_id),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );
    assert!(matches!(action, Some(Action::AddToOwnBuild { .. })));
}

#[test]
fn stale_build_contact_is_rejected() {
    let state = GameState::default();
    let plan = determine_actions(
        Card(3, Suit::Heart),
        Some(&build_contact(uuid::Uuid::new_v4())),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );
    assert!(plan.options.is_empty());
    assert!(plan.error_message.is_some());
}

// ============================================================================
// Stack contacts
// ============================================================================

#[test]
fn own_stack_accepts_another_card() {
    let stack = create_stack(
        Card(2, Suit::Club),
        CardOrigin::Hand,
        Card(3, Suit::Diamond),
        0,
        false,
    )
    .unwrap();
    let stack_id = stack.stack_id;
    let mut state = GameState::default();
    state.table_cards.push(TableItem::TemporaryStack(stack));

    let plan = determine_actions(
        Card(4, Suit::Heart),
        Some(&stack_contact(stack_id)),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );
    assert_eq!(plan.options.len(), 1);
    assert!(matches!(plan.options[0].action, Action::AugmentStack { .. }));
}

#[test]
fn opponent_stack_is_off_limits() {
    let stack = create_stack(
        Card(2, Suit::Club),
        CardOrigin::Hand,
        Card(3, Suit::Diamond),
        1,
        false,
    )
    .unwrap();
    let stack_id = stack.stack_id;
    let mut state = GameState::default();
    state.table_cards.push(TableItem::TemporaryStack(stack));

    let plan = determine_actions(
        Card(4, Suit::Heart),
        Some(&stack_contact(stack_id)),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );
    assert!(plan.options.is_empty());
    assert!(plan.error_message.is_some());
}

// ============================================================================
// Single-action dispatch
// ============================================================================

#[test]
fn contact_dispatch_maps_sources_to_drop_actions() {
    let mut state = GameState::default();
    state.table_cards.push(loose(Card(5, Suit::Diamond)));

    let from_hand = determine_action_from_contact(
        Card(2, Suit::Club),
        &card_contact(Card(5, Suit::Diamond)),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );
    assert!(matches!(from_hand, Some(Action::HandToTableDrop { .. })));

    let from_table = determine_action_from_contact(
        Card(2, Suit::Club),
        &card_contact(Card(5, Suit::Diamond)),
        &state,
        0,
        DragSource::Table,
        &rules(),
    );
    assert!(matches!(from_table, Some(Action::TableToTableDrop { .. })));
}

#[test]
fn contact_dispatch_refuses_off_turn_drops() {
    let mut state = GameState::default();
    state.table_cards.push(loose(Card(5, Suit::Diamond)));
    state.current_player = 1;

    let action = determine_action_from_contact(
        Card(2, Suit::Club),
        &card_contact(Card(5, Suit::Diamond)),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );
    assert!(action.is_none());
}

#[test]
fn contact_dispatch_refuses_an_opponent_build_off_turn() {
    let build = new_build(vec![Card(2, Suit::Club), Card(4, Suit::Diamond)], 1, &rules()).unwrap();
    let (mut state, build_id) = state_with_build(build);
    state.current_player = 1;

    let action = determine_action_from_contact(
        Card(3, Suit::Heart),
        &build_contact(build_id),
        &state,
        0,
        DragSource::Hand,
        &rules(),
    );
    assert!(action.is_none());
}
