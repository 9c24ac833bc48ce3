//! In-memory fakes for orchestrator and dispatcher tests.
//!
//! Each fake implements a store contract over a mutex-guarded map, and
//! the scripted gateway replays queued replies while recording every
//! request it sees, so tests can assert on the exact history sent to
//! the model.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use taskmate_ai::{ChatGateway, ChatRequest, GatewayError, GatewayReply};
use taskmate_conversation::{
    Conversation, ConversationError, ConversationStore, Message, MessageError, MessageStore,
    NewMessage,
};
use taskmate_core::{ConversationId, MessageId, TaskId, UserId};
use taskmate_tasks::{
    NewTask, ProfileError, ProfileStore, Task, TaskError, TaskFilter, TaskPatch, TaskStore,
    UserProfile,
};

#[derive(Default)]
pub struct MemoryConversationStore {
    conversations: Mutex<HashMap<ConversationId, Conversation>>,
    touched: Mutex<HashSet<ConversationId>>,
}

impl MemoryConversationStore {
    pub async fn was_touched(&self, id: ConversationId) -> bool {
        self.touched.lock().unwrap().contains(&id)
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn create(&self, conversation: &Conversation) -> Result<(), ConversationError> {
        self.conversations
            .lock()
            .unwrap()
            .insert(conversation.id, conversation.clone());
        Ok(())
    }

    async fn find(&self, id: ConversationId) -> Result<Option<Conversation>, ConversationError> {
        Ok(self.conversations.lock().unwrap().get(&id).cloned())
    }

    async fn touch(&self, id: ConversationId) -> Result<(), ConversationError> {
        let mut conversations = self.conversations.lock().unwrap();
        let conversation = conversations
            .get_mut(&id)
            .ok_or(ConversationError::NotFound { id })?;
        conversation.touch();
        self.touched.lock().unwrap().insert(id);
        Ok(())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Conversation>, ConversationError> {
        let mut listed: Vec<Conversation> = self
            .conversations
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(listed)
    }
}

#[derive(Default)]
pub struct MemoryMessageStore {
    messages: Mutex<HashMap<ConversationId, Vec<Message>>>,
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn append(&self, new: NewMessage) -> Result<Message, MessageError> {
        new.validate()?;
        // Sequence assignment happens under the store lock, mirroring
        // the per-conversation serialization real stores provide.
        let mut messages = self.messages.lock().unwrap();
        let transcript = messages.entry(new.conversation_id).or_default();
        let message = Message {
            id: MessageId::new(),
            conversation_id: new.conversation_id,
            role: new.role,
            content: new.content,
            sequence: transcript.len() as i64,
            tool_calls: new.tool_calls,
            tool_results: new.tool_results,
            created_at: Utc::now(),
        };
        transcript.push(message.clone());
        Ok(message)
    }

    async fn list(&self, conversation_id: ConversationId) -> Result<Vec<Message>, MessageError> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: Mutex<Vec<Task>>,
}

impl MemoryTaskStore {
    fn position(tasks: &[Task], user_id: UserId, task_id: TaskId) -> Result<usize, TaskError> {
        tasks
            .iter()
            .position(|t| t.id == task_id && t.user_id == user_id)
            .ok_or(TaskError::NotFound { id: task_id })
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, new: NewTask) -> Result<Task, TaskError> {
        let task = Task::new(new);
        self.tasks.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn list(&self, user_id: UserId, filter: TaskFilter) -> Result<Vec<Task>, TaskError> {
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id && filter.matches(t))
            .cloned()
            .collect())
    }

    async fn complete(&self, user_id: UserId, task_id: TaskId) -> Result<Task, TaskError> {
        let mut tasks = self.tasks.lock().unwrap();
        let index = Self::position(&tasks, user_id, task_id)?;
        tasks[index].apply(TaskPatch {
            completed: Some(true),
            ..TaskPatch::default()
        });
        Ok(tasks[index].clone())
    }

    async fn delete(&self, user_id: UserId, task_id: TaskId) -> Result<Task, TaskError> {
        let mut tasks = self.tasks.lock().unwrap();
        let index = Self::position(&tasks, user_id, task_id)?;
        Ok(tasks.remove(index))
    }

    async fn update(
        &self,
        user_id: UserId,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> Result<Task, TaskError> {
        let mut tasks = self.tasks.lock().unwrap();
        let index = Self::position(&tasks, user_id, task_id)?;
        tasks[index].apply(patch);
        Ok(tasks[index].clone())
    }
}

#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<UserId, UserProfile>>,
}

impl MemoryProfileStore {
    pub fn with_profile(profile: UserProfile) -> Self {
        let store = Self::default();
        store
            .profiles
            .lock()
            .unwrap()
            .insert(profile.id, profile);
        store
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn find(&self, user_id: UserId) -> Result<UserProfile, ProfileError> {
        self.profiles
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or(ProfileError::NotFound { id: user_id })
    }
}

/// Gateway fake replaying queued results.
///
/// An empty queue answers with an empty, tool-free reply so unscripted
/// turns still complete.
#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<GatewayReply, GatewayError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedGateway {
    pub fn push(&self, reply: Result<GatewayReply, GatewayError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatGateway for ScriptedGateway {
    async fn generate(&self, request: &ChatRequest) -> Result<GatewayReply, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(GatewayReply {
                    text: String::new(),
                    tool_calls: Vec::new(),
                })
            })
    }
}
