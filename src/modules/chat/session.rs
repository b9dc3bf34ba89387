use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use super::conversation::{Conversation, ConversationId, Message, Role, UserAppState, DEFAULT_CONVERSATION_NAME};
use super::persistence::Persistence;
use super::store::BlobStore;
use super::SessionError;
use crate::config::EngineConfig;
use crate::modules::emotion::{
    sanitize_mind_state, sanitize_shift, Background, CrazyMode, Emotion, EmotionError, EmotionGroup,
    EmotionalState, GradientDeriver, InertiaEngine, Intensity, Shift, UserMindState, MAX_INTENSITY,
};

pub const FALLBACK_RESPONSE: &str = "Sorry, my thoughts scattered for a moment. Could you say that again?";
pub const FALLBACK_CONFUSION_BUMP: Intensity = 30;

/// Result of one call to the AI provider, as handed over by the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AiReply {
    Success {
        #[serde(default)]
        thought: Option<String>,
        #[serde(default)]
        response: Option<String>,
        #[serde(default)]
        shifts: Value,
        #[serde(default)]
        mind_state: Option<Value>,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TurnReport {
    pub applied: Shift,
    pub skipped_frozen: bool,
    pub provider_error: Option<String>,
}

/// Everything the AI collaborator needs to build its next request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptContext {
    pub messages: Vec<Message>,
    pub emotional_state: EmotionalState,
    pub custom_instruction: String,
    pub memory: String,
    pub mind_state: UserMindState,
}

pub struct ChatSession<S: BlobStore> {
    config: EngineConfig,
    persistence: Persistence<S>,
    state: UserAppState,
    inertia: InertiaEngine,
    gradient: GradientDeriver,
    crazy: CrazyMode,
    crazy_updates: Option<UnboundedReceiver<Shift>>,
}

impl<S: BlobStore> ChatSession<S> {
    pub fn open(config: EngineConfig, store: S) -> Self {
        let persistence = Persistence::new(store, config.persistence.storage_key.clone());
        let state = persistence.load();

        Self {
            inertia: InertiaEngine::new(&config.inertia),
            gradient: GradientDeriver::new(config.gradient.clone()),
            config,
            persistence,
            state,
            crazy: CrazyMode::new(),
            crazy_updates: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &UserAppState {
        &self.state
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn active_conversation(&self) -> Result<&Conversation, SessionError> {
        self.state.active().ok_or(SessionError::NoActiveConversation)
    }

    fn active_mut(&mut self) -> Result<&mut Conversation, SessionError> {
        self.state.active_mut().ok_or(SessionError::NoActiveConversation)
    }

    fn save(&self) {
        self.persistence.save(&self.state);
    }

    fn commit(&mut self, transition: impl FnOnce(&EmotionalState) -> EmotionalState) -> Result<(), SessionError> {
        let conversation = self.active_mut()?;
        conversation.emotional_state = transition(&conversation.emotional_state);
        self.save();
        Ok(())
    }

    pub fn new_conversation(&mut self, name: Option<&str>) -> ConversationId {
        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_CONVERSATION_NAME);
        let id = self.state.add_conversation(Conversation::new(name));
        self.discard_crazy_updates();
        log::info!("Created conversation {}", id);
        self.save();
        id
    }

    pub fn switch_conversation(&mut self, id: &str) -> Result<(), SessionError> {
        if !self.state.chats.contains_key(id) {
            return Err(SessionError::ConversationNotFound(id.to_string()));
        }
        self.state.active_chat_id = Some(id.to_string());
        self.discard_crazy_updates();
        self.save();
        Ok(())
    }

    pub fn set_custom_instruction(&mut self, instruction: &str) {
        self.state.custom_instruction = instruction.to_string();
        self.save();
    }

    pub fn prompt_context(&self) -> Result<PromptContext, SessionError> {
        let conversation = self.active_conversation()?;
        Ok(PromptContext {
            messages: conversation.messages.clone(),
            emotional_state: conversation.emotional_state.clone(),
            custom_instruction: self.state.custom_instruction.clone(),
            memory: self.state.identity.narrative.clone(),
            mind_state: conversation.mind_state.clone(),
        })
    }

    pub fn record_user_message(&mut self, text: &str) -> Result<(), SessionError> {
        self.active_mut()?.messages.push(Message::new(Role::User, text));
        self.state.identity.total_messages += 1;
        self.save();
        Ok(())
    }

    /// Stores the reply text and blends the proposed shift into the active conversation.
    /// A failed provider call still moves the state, toward more confusion.
    pub fn apply_ai_reply(&mut self, reply: AiReply) -> Result<TurnReport, SessionError> {
        let history_limit = self.config.persistence.history_limit;
        let inertia = self.inertia.clone();
        let mut report = TurnReport::default();
        let mut stored_messages = 0;

        let conversation = self.state.active_mut().ok_or(SessionError::NoActiveConversation)?;

        let shift = match reply {
            AiReply::Success {
                thought,
                response,
                shifts,
                mind_state,
            } => {
                if let Some(thought) = thought.filter(|text| !text.is_empty()) {
                    conversation.messages.push(Message::new(Role::Thought, thought));
                }
                if let Some(response) = response.filter(|text| !text.is_empty()) {
                    conversation.messages.push(Message::new(Role::Assistant, response));
                    stored_messages += 1;
                }
                if let Some(raw) = mind_state {
                    conversation.mind_state = sanitize_mind_state(&raw);
                }
                sanitize_shift(&shifts)
            }
            AiReply::Failed { error } => {
                log::error!("AI provider call failed: {}", error);
                conversation.messages.push(Message::new(Role::Assistant, FALLBACK_RESPONSE));
                stored_messages += 1;
                report.provider_error = Some(error);
                fallback_shift(&conversation.emotional_state)
            }
        };

        if conversation.frozen {
            log::debug!("Conversation {} is frozen; skipping emotional update", conversation.id);
            report.skipped_frozen = true;
        } else if !shift.is_empty() {
            conversation.push_snapshot(history_limit);
            conversation.emotional_state = inertia.apply(&conversation.emotional_state, &shift);
            report.applied = shift;
        }

        self.state.identity.total_messages += stored_messages;
        self.save();
        Ok(report)
    }

    pub fn emotion(&self, name: &str) -> Result<Intensity, SessionError> {
        Ok(self.active_conversation()?.emotional_state.get_by_name(name)?)
    }

    /// Manual edit; out-of-range values are rejected rather than clamped.
    pub fn set_emotion(&mut self, name: &str, value: i64) -> Result<Intensity, SessionError> {
        let emotion: Emotion = name.parse()?;
        if !(0..=MAX_INTENSITY as i64).contains(&value) {
            return Err(EmotionError::InvalidIntensity {
                emotion: emotion.name().to_string(),
                value: value.to_string(),
            }
            .into());
        }
        self.commit(|state| state.set(emotion, value as f64))?;
        Ok(value as Intensity)
    }

    pub fn adjust_group(&mut self, group: &str, delta: i32) -> Result<(), SessionError> {
        let group: EmotionGroup = group.parse()?;
        self.commit(|state| state.adjust_group(group, delta))
    }

    pub fn max_group(&mut self, group: &str) -> Result<(), SessionError> {
        let group: EmotionGroup = group.parse()?;
        self.commit(|state| state.max_group(group))
    }

    pub fn clear_all(&mut self) -> Result<(), SessionError> {
        self.commit(EmotionalState::clear_all)
    }

    pub fn reset_to_default(&mut self) -> Result<(), SessionError> {
        self.commit(|_| EmotionalState::create_default())
    }

    pub fn set_frozen(&mut self, frozen: bool) -> Result<(), SessionError> {
        self.active_mut()?.frozen = frozen;
        self.save();
        Ok(())
    }

    pub fn mark_coherence_check(&mut self) -> Result<(), SessionError> {
        self.active_mut()?.last_coherence_check = Some(Utc::now());
        self.save();
        Ok(())
    }

    pub fn background(&self) -> Result<Background, SessionError> {
        Ok(self.gradient.background(&self.active_conversation()?.emotional_state))
    }

    pub fn color(&self, name: &str) -> Result<String, SessionError> {
        let emotion: Emotion = name.parse()?;
        let intensity = self.active_conversation()?.emotional_state.get(emotion);
        Ok(self.gradient.color(emotion, intensity as i32))
    }

    pub fn export(&self) -> Result<String, SessionError> {
        Ok(self.persistence.export(&self.state)?)
    }

    pub fn import(&mut self, json: &str) -> Result<(), SessionError> {
        self.state = self.persistence.import(json)?;
        self.discard_crazy_updates();
        log::info!("Imported {} conversation(s)", self.state.chats.len());
        self.save();
        Ok(())
    }

    /// Must be called from within a tokio runtime. Returns `false` if already running.
    pub fn start_crazy_mode(&mut self) -> bool {
        let interval = Duration::from_millis(self.config.crazy_mode.interval_ms);
        match self.crazy.start(interval) {
            Some(receiver) => {
                self.crazy_updates = Some(receiver);
                true
            }
            None => false,
        }
    }

    pub fn stop_crazy_mode(&mut self) -> bool {
        self.crazy_updates = None;
        self.crazy.stop()
    }

    pub fn crazy_mode_running(&self) -> bool {
        self.crazy.is_running()
    }

    /// Shifts produced for the previously active conversation are not carried over.
    fn discard_crazy_updates(&mut self) {
        if let Some(receiver) = self.crazy_updates.as_mut() {
            let mut dropped = 0;
            while receiver.try_recv().is_ok() {
                dropped += 1;
            }
            if dropped > 0 {
                log::debug!("Discarded {} pending crazy mode update(s)", dropped);
            }
        }
    }

    /// Applies every randomized shift received since the last pump. Frozen
    /// conversations discard them.
    pub fn pump_crazy_mode(&mut self) -> Result<usize, SessionError> {
        let mut pending = Vec::new();
        if let Some(receiver) = self.crazy_updates.as_mut() {
            while let Ok(shift) = receiver.try_recv() {
                pending.push(shift);
            }
        }

        if pending.is_empty() {
            return Ok(0);
        }

        let conversation = self.active_mut()?;
        if conversation.frozen {
            return Ok(0);
        }

        for shift in &pending {
            conversation.emotional_state = conversation.emotional_state.set_many(shift);
        }
        self.save();
        Ok(pending.len())
    }
}

fn fallback_shift(current: &EmotionalState) -> Shift {
    let mut shift = Shift::new();
    if let Some(confusion) = Emotion::from_name("confusion") {
        let target = current.get(confusion).saturating_add(FALLBACK_CONFUSION_BUMP).min(MAX_INTENSITY);
        shift.insert(confusion, target);
    }
    shift
}
