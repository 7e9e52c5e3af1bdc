//! Wire action envelopes and the action-determination engine.
//!
//! Inbound payloads carry fully-resolved card/stack/build identifiers,
//! never raw coordinates. The payload shape is fixed per `type` variant
//! and checked at deserialization, not deep inside handlers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::contact::{ContactData, ContactPosition};

use super::builds;
use super::engine::{MatchRules, find_build_with_value};
use super::entities::{Build, BuildId, Card, GameState, PlayerIndex, StackId, TemporaryStack};

/// Which container the dragged card left.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DragSource {
    Hand,
    Table,
}

/// The combination consuming a capture.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "from", rename_all = "lowercase")]
pub enum CaptureSource {
    Hand { card: Card },
    Stack { stack_id: StackId },
}

/// One item removed from the table by a capture.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "item", rename_all = "lowercase")]
pub enum CaptureTarget {
    Loose { card: Card },
    Build { build_id: BuildId },
}

/// Inbound action envelope, one variant per wire `type`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum Action {
    #[serde(rename = "trail")]
    Trail { card: Card },
    #[serde(rename = "cancel-trail")]
    CancelTrail { card: Card },
    #[serde(rename = "build")]
    Build { stack_id: StackId },
    #[serde(rename = "capture")]
    Capture {
        source: CaptureSource,
        captured: Vec<CaptureTarget>,
    },
    #[serde(rename = "extendBuild")]
    ExtendBuild {
        build_id: BuildId,
        card: Card,
        source: DragSource,
    },
    #[serde(rename = "ReinforceBuild")]
    ReinforceBuild {
        build_id: BuildId,
        from_build_id: BuildId,
        card: Card,
    },
    #[serde(rename = "addToOwnBuild")]
    AddToOwnBuild {
        build_id: BuildId,
        card: Card,
        source: DragSource,
    },
    #[serde(rename = "validateBuildAugmentation")]
    ValidateBuildAugmentation { build_id: BuildId, stack_id: StackId },
    #[serde(rename = "tableToTableDrop")]
    TableToTableDrop { dragged: Card, target: Card },
    #[serde(rename = "handToTableDrop")]
    HandToTableDrop { card: Card, target: Card },
    #[serde(rename = "augmentStack")]
    AugmentStack {
        stack_id: StackId,
        card: Card,
        source: DragSource,
    },
    #[serde(rename = "cancelStack")]
    CancelStack { stack_id: StackId },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Trail { card } => &format!("trails {card}"),
            Self::CancelTrail { card } => &format!("takes back {card}"),
            Self::Build { .. } => "commits a build",
            Self::Capture { .. } => "captures",
            Self::ExtendBuild { card, .. } => &format!("extends a build with {card}"),
            Self::ReinforceBuild { .. } => "reinforces a build",
            Self::AddToOwnBuild { card, .. } => &format!("adds {card} to their build"),
            Self::ValidateBuildAugmentation { .. } => "augments their build",
            Self::TableToTableDrop { .. } => "combines two table cards",
            Self::HandToTableDrop { .. } => "stages a hand card",
            Self::AugmentStack { card, .. } => &format!("adds {card} to a stack"),
            Self::CancelStack { .. } => "unwinds a stack",
        };
        write!(f, "{repr}")
    }
}

/// Category tag on a candidate option, mirrored back by the
/// disambiguation surface.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum OptionKind {
    #[serde(rename = "build")]
    Build,
    #[serde(rename = "capture")]
    Capture,
    #[serde(rename = "extendBuild")]
    ExtendBuild,
    #[serde(rename = "ReinforceBuild")]
    ReinforceBuild,
    #[serde(rename = "trail")]
    Trail,
}

/// One candidate action offered to the player. The surface must send
/// back `action` exactly as given.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ActionOption {
    pub kind: OptionKind,
    pub label: String,
    pub action: Action,
}

/// Outcome of action determination for one drag-end event.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlan {
    pub options: Vec<ActionOption>,
    pub requires_modal: bool,
    pub error_message: Option<String>,
}

impl ActionPlan {
    fn rejected(message: &str) -> Self {
        Self {
            options: Vec::new(),
            requires_modal: false,
            error_message: Some(message.to_string()),
        }
    }
}

/// Map a resolved contact to a single unambiguous action, or `None` when
/// the drop is illegal or needs disambiguation. The caller is
/// responsible for snap-back on `None`, never for inferring an
/// alternate action.
pub fn determine_action_from_contact(
    dragged: Card,
    contact: &ContactPosition,
    state: &GameState,
    player: PlayerIndex,
    source: DragSource,
    rules: &MatchRules,
) -> Option<Action> {
    let on_turn = state.current_player == player;
    match &contact.data {
        ContactData::Card { card: target } => {
            if !on_turn {
                return None;
            }
            let target = *target;
            state.loose_cards().find(|l| l.card == target)?;
            card_drop_action(dragged, target, source)
        }
        ContactData::Build { build_id } => {
            let build = state.find_build(*build_id)?;
            if build.owner == player {
                // Own-build augmentation is legal even off-turn.
                dragged.build_value()?;
                Some(Action::AddToOwnBuild {
                    build_id: build.build_id,
                    card: dragged,
                    source,
                })
            } else {
                if !on_turn {
                    return None;
                }
                extension_action(dragged, build, player, source, rules).map(|(action, _)| action)
            }
        }
        ContactData::Stack { stack_id } => {
            if !on_turn {
                return None;
            }
            let stack = state.find_stack(*stack_id)?;
            if stack.owner != player {
                return None;
            }
            dragged.build_value()?;
            Some(Action::AugmentStack {
                stack_id: stack.stack_id,
                card: dragged,
                source,
            })
        }
    }
}

/// Full candidate-set determination for ambiguous drops. An empty target
/// means the card was released over open table area: the only legal
/// action is a trail, which needs modal confirmation before committing.
pub fn determine_actions(
    dragged: Card,
    target: Option<&ContactPosition>,
    state: &GameState,
    player: PlayerIndex,
    source: DragSource,
    rules: &MatchRules,
) -> ActionPlan {
    let on_turn = state.current_player == player;

    let Some(contact) = target else {
        if !on_turn || source != DragSource::Hand {
            return ActionPlan::rejected("you can only trail a hand card on your turn");
        }
        return ActionPlan {
            options: vec![ActionOption {
                kind: OptionKind::Trail,
                label: format!("Trail {dragged}"),
                action: Action::Trail { card: dragged },
            }],
            requires_modal: true,
            error_message: None,
        };
    };

    let mut options: Vec<ActionOption> = Vec::new();
    match &contact.data {
        ContactData::Card { card: target } => {
            let target = *target;
            if !on_turn {
                return ActionPlan::rejected("not your turn");
            }
            if state.loose_cards().all(|l| l.card != target) {
                return ActionPlan::rejected("that card is no longer on the table");
            }
            if let Some(capture) = capture_option(dragged, target, state, player, source) {
                options.push(capture);
            }
            if let Some(stage) = staging_option(dragged, target, source) {
                options.push(stage);
            }
        }
        ContactData::Build { build_id } => {
            let Some(build) = state.find_build(*build_id) else {
                return ActionPlan::rejected("that build is no longer on the table");
            };
            if build.owner == player {
                if dragged.build_value().is_some() {
                    options.push(ActionOption {
                        kind: OptionKind::Build,
                        label: format!("Add {dragged} to your build"),
                        action: Action::AddToOwnBuild {
                            build_id: build.build_id,
                            card: dragged,
                            source,
                        },
                    });
                }
            } else if on_turn {
                if let Some((action, new_value)) =
                    extension_action(dragged, build, player, source, rules)
                {
                    options.push(ActionOption {
                        kind: OptionKind::ExtendBuild,
                        label: format!("Extend build to {new_value}"),
                        action,
                    });
                    // Merge path: the extension's target value already has
                    // a build owned by this player.
                    if let Some(existing) = find_build_with_value(state, player, new_value) {
                        options.push(ActionOption {
                            kind: OptionKind::ReinforceBuild,
                            label: format!("Merge into your {new_value} build"),
                            action: Action::ReinforceBuild {
                                build_id: existing.build_id,
                                from_build_id: build.build_id,
                                card: dragged,
                            },
                        });
                    }
                }
                // Capturing consumes a hand card; a table card can only
                // extend.
                if source == DragSource::Hand && dragged.build_value() == Some(build.value) {
                    options.push(ActionOption {
                        kind: OptionKind::Capture,
                        label: format!("Capture the {} build", build.value),
                        action: Action::Capture {
                            source: CaptureSource::Hand { card: dragged },
                            captured: vec![CaptureTarget::Build {
                                build_id: build.build_id,
                            }],
                        },
                    });
                }
            }
        }
        ContactData::Stack { stack_id } => {
            if !on_turn {
                return ActionPlan::rejected("not your turn");
            }
            match stack_option(dragged, *stack_id, state, player, source) {
                Some(option) => options.push(option),
                None => return ActionPlan::rejected("that stack can't take this card"),
            }
        }
    }

    if options.is_empty() {
        return ActionPlan::rejected("no legal move for that card");
    }
    let requires_modal = options.len() > 1;
    ActionPlan {
        options,
        requires_modal,
        error_message: None,
    }
}

fn card_drop_action(dragged: Card, target: Card, source: DragSource) -> Option<Action> {
    if dragged.build_value().is_none() || target.build_value().is_none() {
        // Face cards can't stage; a rank pair is a direct capture.
        if dragged.0 == target.0 && source == DragSource::Hand {
            return Some(Action::Capture {
                source: CaptureSource::Hand { card: dragged },
                captured: vec![CaptureTarget::Loose { card: target }],
            });
        }
        return None;
    }
    match source {
        DragSource::Hand => Some(Action::HandToTableDrop {
            card: dragged,
            target,
        }),
        DragSource::Table => Some(Action::TableToTableDrop { dragged, target }),
    }
}

fn extension_action(
    dragged: Card,
    build: &Build,
    player: PlayerIndex,
    source: DragSource,
    rules: &MatchRules,
) -> Option<(Action, u8)> {
    if !builds::can_build_be_extended(build, player) {
        return None;
    }
    // Re-validated by the store before mutation; this keeps obviously
    // illegal options out of the candidate list.
    let new_value = builds::validate_build_extension(build, dragged, rules).ok()?;
    Some((
        Action::ExtendBuild {
            build_id: build.build_id,
            card: dragged,
            source,
        },
        new_value,
    ))
}

fn capture_option(
    dragged: Card,
    target: Card,
    state: &GameState,
    _player: PlayerIndex,
    source: DragSource,
) -> Option<ActionOption> {
    if source != DragSource::Hand {
        return None;
    }
    let mut captured: Vec<CaptureTarget> = Vec::new();
    match dragged.build_value() {
        Some(value) => {
            if target.build_value() != Some(value) {
                return None;
            }
            // A capture takes every matching loose card and build.
            for loose in state.loose_cards() {
                if loose.card.build_value() == Some(value) {
                    captured.push(CaptureTarget::Loose { card: loose.card });
                }
            }
            for build in state.builds() {
                if build.value == value {
                    captured.push(CaptureTarget::Build {
                        build_id: build.build_id,
                    });
                }
            }
        }
        None => {
            if dragged.0 != target.0 {
                return None;
            }
            for loose in state.loose_cards() {
                if loose.card.0 == dragged.0 {
                    captured.push(CaptureTarget::Loose { card: loose.card });
                }
            }
        }
    }
    if captured.is_empty() {
        return None;
    }
    Some(ActionOption {
        kind: OptionKind::Capture,
        label: format!("Capture with {dragged}"),
        action: Action::Capture {
            source: CaptureSource::Hand { card: dragged },
            captured,
        },
    })
}

fn staging_option(dragged: Card, target: Card, source: DragSource) -> Option<ActionOption> {
    let dragged_value = dragged.build_value()?;
    let target_value = target.build_value()?;
    let sum = dragged_value + target_value;
    let action = match source {
        DragSource::Hand => Action::HandToTableDrop {
            card: dragged,
            target,
        },
        DragSource::Table => Action::TableToTableDrop { dragged, target },
    };
    Some(ActionOption {
        kind: OptionKind::Build,
        label: format!("Build {sum}"),
        action,
    })
}

fn stack_option(
    dragged: Card,
    stack_id: StackId,
    state: &GameState,
    player: PlayerIndex,
    source: DragSource,
) -> Option<ActionOption> {
    let stack: &TemporaryStack = state.find_stack(stack_id)?;
    if stack.owner != player {
        return None;
    }
    dragged.build_value()?;
    Some(ActionOption {
        kind: OptionKind::Build,
        label: format!("Add {dragged} to the stack"),
        action: Action::AugmentStack {
            stack_id,
            card: dragged,
            source,
        },
    })
}
