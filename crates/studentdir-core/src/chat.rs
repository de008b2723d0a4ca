//! Group chat: groups and membership, the message feed and its poll loop.
//!
//! [`InMemoryChat`] owns groups, memberships and message logs. Only members
//! read or post in a group, and only the creator deletes it.
//!
//! Messages are identified by `(timestamp, sender)`. A [`MessageFeed`] drops
//! messages it has already seen and remembers the last one received as the
//! cursor for the next fetch. [`ChatPoller`] drives a feed from any
//! [`MessageSource`] on a fixed interval.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast, mpsc};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use studentdir_config::ChatConfig;

use crate::model::last_name_of;
use crate::query::collate;
use crate::roster::Roster;
use crate::{BoxFuture, ShutdownSignal};

/// Most messages a source returns per fetch.
pub const FETCH_LIMIT: usize = 200;

/// Errors from chat operations and message sources.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("unknown group: {0}")]
    UnknownGroup(String),

    #[error("group name required")]
    EmptyGroupName,

    #[error("student id required")]
    MissingStudentId,

    #[error("unknown student: {0}")]
    UnknownStudent(String),

    #[error("{student} is not a member of group {group}")]
    NotAMember { group: String, student: String },

    #[error("only the creator may delete group {group}, not {student}")]
    NotCreator { group: String, student: String },

    #[error("empty message")]
    EmptyMessage,

    #[error("message source failed: {0}")]
    Source(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Student id of the creator.
    pub created_by: String,
    /// Student ids of the members.
    #[serde(default)]
    pub members: Vec<String>,
}

impl ChatGroup {
    pub fn is_member(&self, student_id: &str) -> bool {
        self.members.iter().any(|m| m == student_id)
    }
}

/// A group member as shown in the member list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: String,
    pub name: String,
}

/// Groups split by whether the viewer has joined them.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GroupSearch<'a> {
    pub joined: Vec<&'a ChatGroup>,
    pub other: Vec<&'a ChatGroup>,
}

#[derive(Debug, Clone, Default)]
pub struct GroupDirectory {
    groups: Vec<ChatGroup>,
}

impl GroupDirectory {
    pub fn new(groups: Vec<ChatGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[ChatGroup] {
        &self.groups
    }

    pub fn get(&self, id: &str) -> Option<&ChatGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Groups whose name contains the trimmed `query` (case-insensitive),
    /// partitioned by membership in `joined_ids`. Order is preserved.
    pub fn search<'a>(&'a self, query: &str, joined_ids: &HashSet<String>) -> GroupSearch<'a> {
        let needle = query.trim().to_lowercase();
        let (joined, other): (Vec<&ChatGroup>, Vec<&ChatGroup>) = self
            .groups
            .iter()
            .filter(|g| needle.is_empty() || g.name.to_lowercase().contains(&needle))
            .partition(|g| joined_ids.contains(&g.id));
        GroupSearch { joined, other }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// ISO-8601 send time, e.g. `2025-12-07T18:01:02`.
    pub timestamp: String,
    /// Student id of the sender.
    pub sender: String,
    pub text: String,
}

impl ChatMessage {
    pub fn key(&self) -> (&str, &str) {
        (&self.timestamp, &self.sender)
    }
}

/// Position after the last message received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub timestamp: String,
    pub sender: String,
}

impl Cursor {
    /// Whether `message` sorts strictly after this cursor.
    pub fn precedes(&self, message: &ChatMessage) -> bool {
        (message.timestamp.as_str(), message.sender.as_str())
            > (self.timestamp.as_str(), self.sender.as_str())
    }
}

/// De-duplicating view of one group's messages.
#[derive(Debug, Clone, Default)]
pub struct MessageFeed {
    group_id: Option<String>,
    seen: HashSet<(String, String)>,
    cursor: Option<Cursor>,
}

impl MessageFeed {
    pub fn for_group(group_id: impl Into<String>) -> Self {
        Self {
            group_id: Some(group_id.into()),
            ..Default::default()
        }
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Make `group_id` active, forgetting seen messages and the cursor.
    pub fn switch_group(&mut self, group_id: impl Into<String>) {
        self.group_id = Some(group_id.into());
        self.seen.clear();
        self.cursor = None;
    }

    /// Record a fetched batch and return the messages not seen before.
    ///
    /// The cursor moves to the last message of a non-empty batch.
    pub fn accept(&mut self, batch: Vec<ChatMessage>) -> Vec<ChatMessage> {
        if let Some(last) = batch.last() {
            self.cursor = Some(Cursor {
                timestamp: last.timestamp.clone(),
                sender: last.sender.clone(),
            });
        }
        batch
            .into_iter()
            .filter(|m| self.seen.insert((m.timestamp.clone(), m.sender.clone())))
            .collect()
    }
}

/// Backend that serves a group's messages after a cursor.
pub trait MessageSource: Send + Sync {
    /// Messages of `group_id` after `after` (all when `None`), oldest first.
    fn fetch_after(
        &self,
        group_id: &str,
        after: Option<&Cursor>,
    ) -> BoxFuture<'_, Result<Vec<ChatMessage>, ChatError>>;
}

#[derive(Debug, Default)]
struct ChatState {
    next_id: u64,
    groups: Vec<ChatGroup>,
    logs: HashMap<String, Vec<ChatMessage>>,
}

impl ChatState {
    fn group(&self, group_id: &str) -> Result<&ChatGroup, ChatError> {
        self.groups
            .iter()
            .find(|g| g.id == group_id)
            .ok_or_else(|| ChatError::UnknownGroup(group_id.to_string()))
    }

    fn group_mut(&mut self, group_id: &str) -> Result<&mut ChatGroup, ChatError> {
        self.groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| ChatError::UnknownGroup(group_id.to_string()))
    }

    /// The group, provided `student_id` belongs to it.
    fn joined(&self, group_id: &str, student_id: &str) -> Result<&ChatGroup, ChatError> {
        let group = self.group(group_id)?;
        if !group.is_member(student_id) {
            return Err(ChatError::NotAMember {
                group: group_id.to_string(),
                student: student_id.to_string(),
            });
        }
        Ok(group)
    }
}

/// In-process chat backend: groups, memberships and one ordered message
/// log per group.
///
/// Students are checked against the roster the store was built with.
#[derive(Debug)]
pub struct InMemoryChat {
    roster: Arc<Roster>,
    member_summary_chars: usize,
    state: RwLock<ChatState>,
}

impl InMemoryChat {
    pub fn new(roster: Arc<Roster>) -> Self {
        Self::from_config(roster, &ChatConfig::default())
    }

    pub fn from_config(roster: Arc<Roster>, config: &ChatConfig) -> Self {
        Self {
            roster,
            member_summary_chars: config.member_summary_chars,
            state: RwLock::new(ChatState::default()),
        }
    }

    /// Create a group named `name` (trimmed) with `creator` as its only member.
    pub async fn create_group(
        &self,
        name: &str,
        description: &str,
        creator: &str,
    ) -> Result<ChatGroup, ChatError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChatError::EmptyGroupName);
        }
        if self.roster.get(creator).is_none() {
            return Err(ChatError::UnknownStudent(creator.to_string()));
        }

        let mut state = self.state.write().await;
        state.next_id += 1;
        let group = ChatGroup {
            id: state.next_id.to_string(),
            name: name.to_string(),
            description: description.trim().to_string(),
            created_by: creator.to_string(),
            members: vec![creator.to_string()],
        };
        state.logs.insert(group.id.clone(), Vec::new());
        state.groups.push(group.clone());
        info!(group = %group.id, name = %group.name, creator, "chat group created");
        Ok(group)
    }

    /// Delete a group together with its messages and memberships.
    pub async fn delete_group(&self, group_id: &str, requester: &str) -> Result<(), ChatError> {
        let mut state = self.state.write().await;
        if state.group(group_id)?.created_by != requester {
            return Err(ChatError::NotCreator {
                group: group_id.to_string(),
                student: requester.to_string(),
            });
        }
        state.groups.retain(|g| g.id != group_id);
        state.logs.remove(group_id);
        info!(group = group_id, "chat group deleted");
        Ok(())
    }

    /// Add `student_id` to a group on behalf of an existing member.
    ///
    /// Returns `false` when the student was already a member.
    pub async fn add_member(
        &self,
        group_id: &str,
        requester: &str,
        student_id: &str,
    ) -> Result<bool, ChatError> {
        let mut state = self.state.write().await;
        state.joined(group_id, requester)?;

        let student_id = student_id.trim();
        if student_id.is_empty() {
            return Err(ChatError::MissingStudentId);
        }
        if self.roster.get(student_id).is_none() {
            return Err(ChatError::UnknownStudent(student_id.to_string()));
        }

        let group = state.group_mut(group_id)?;
        if group.is_member(student_id) {
            return Ok(false);
        }
        group.members.push(student_id.to_string());
        debug!(group = group_id, student = student_id, "member added");
        Ok(true)
    }

    /// Members of a group, ordered by last name then full name.
    ///
    /// Ids missing from the roster are listed under the id itself.
    pub async fn members(
        &self,
        group_id: &str,
        requester: &str,
    ) -> Result<Vec<GroupMember>, ChatError> {
        let state = self.state.read().await;
        let group = state.joined(group_id, requester)?;
        let mut members: Vec<GroupMember> = group
            .members
            .iter()
            .map(|id| {
                let name = self
                    .roster
                    .get(id)
                    .map(|s| s.name.trim())
                    .filter(|n| !n.is_empty())
                    .unwrap_or(id.as_str());
                GroupMember {
                    id: id.clone(),
                    name: name.to_string(),
                }
            })
            .collect();
        members.sort_by(|a, b| {
            collate(last_name_of(&a.name), last_name_of(&b.name))
                .then_with(|| collate(&a.name, &b.name))
        });
        Ok(members)
    }

    /// The member line for a group header, fitted to the configured width.
    pub async fn member_header(
        &self,
        group_id: &str,
        requester: &str,
    ) -> Result<MemberSummary, ChatError> {
        let names: Vec<String> = self
            .members(group_id, requester)
            .await?
            .into_iter()
            .map(|m| m.name)
            .collect();
        Ok(member_summary(&names, self.member_summary_chars))
    }

    /// Groups `student_id` has joined, ordered by name.
    pub async fn groups_for(&self, student_id: &str) -> Vec<ChatGroup> {
        let state = self.state.read().await;
        let mut groups: Vec<ChatGroup> = state
            .groups
            .iter()
            .filter(|g| g.is_member(student_id))
            .cloned()
            .collect();
        groups.sort_by(|a, b| collate(&a.name, &b.name));
        groups
    }

    /// Snapshot of every group, for searching.
    pub async fn directory(&self) -> GroupDirectory {
        GroupDirectory::new(self.state.read().await.groups.clone())
    }

    /// Post `message` as its sender, who must be a member.
    ///
    /// The text is trimmed and must not be empty. The log stays ordered by
    /// `(timestamp, sender)`; the stored message is returned.
    pub async fn post(
        &self,
        group_id: &str,
        mut message: ChatMessage,
    ) -> Result<ChatMessage, ChatError> {
        let mut state = self.state.write().await;
        state.joined(group_id, &message.sender)?;

        let text = message.text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        message.text = text.to_string();

        let log = state.logs.entry(group_id.to_string()).or_default();
        let at = log.partition_point(|m| m.key() <= message.key());
        log.insert(at, message.clone());
        Ok(message)
    }

    /// Up to [`FETCH_LIMIT`] messages after `after`, oldest first, for a
    /// member of the group.
    pub async fn messages_after(
        &self,
        group_id: &str,
        viewer: &str,
        after: Option<&Cursor>,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let state = self.state.read().await;
        state.joined(group_id, viewer)?;
        Ok(state
            .logs
            .get(group_id)
            .map(|log| {
                log.iter()
                    .filter(|m| after.is_none_or(|c| c.precedes(m)))
                    .take(FETCH_LIMIT)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    /// A [`MessageSource`] reading as `viewer`.
    pub fn reader(self: &Arc<Self>, viewer: impl Into<String>) -> MemberMessages {
        MemberMessages {
            chat: Arc::clone(self),
            viewer: viewer.into(),
        }
    }
}

/// Messages of an [`InMemoryChat`] as seen by one student.
#[derive(Debug, Clone)]
pub struct MemberMessages {
    chat: Arc<InMemoryChat>,
    viewer: String,
}

impl MessageSource for MemberMessages {
    fn fetch_after(
        &self,
        group_id: &str,
        after: Option<&Cursor>,
    ) -> BoxFuture<'_, Result<Vec<ChatMessage>, ChatError>> {
        let group_id = group_id.to_string();
        let after = after.cloned();
        Box::pin(async move {
            self.chat
                .messages_after(&group_id, &self.viewer, after.as_ref())
                .await
        })
    }
}

/// Polls one group and forwards unseen messages.
pub struct ChatPoller {
    source: Arc<dyn MessageSource>,
    feed: MessageFeed,
    interval: Duration,
}

impl ChatPoller {
    pub fn new(
        source: Arc<dyn MessageSource>,
        group_id: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            feed: MessageFeed::for_group(group_id),
            interval,
        }
    }

    pub fn from_config(
        source: Arc<dyn MessageSource>,
        group_id: impl Into<String>,
        config: &ChatConfig,
    ) -> Self {
        Self::new(source, group_id, Duration::from_millis(config.poll_interval_ms))
    }

    pub fn feed(&self) -> &MessageFeed {
        &self.feed
    }

    /// Fetch once and return the unseen messages.
    pub async fn poll_once(&mut self) -> Result<Vec<ChatMessage>, ChatError> {
        let Some(group_id) = self.feed.group_id().map(str::to_string) else {
            return Ok(Vec::new());
        };
        let batch = self.source.fetch_after(&group_id, self.feed.cursor()).await?;
        let fresh = self.feed.accept(batch);
        if !fresh.is_empty() {
            debug!(group = %group_id, count = fresh.len(), "new chat messages");
        }
        Ok(fresh)
    }

    /// Poll until shutdown or until the receiver goes away.
    ///
    /// A failed fetch is logged and retried on the next tick.
    pub async fn run(
        mut self,
        tx: mpsc::Sender<ChatMessage>,
        mut shutdown_rx: broadcast::Receiver<ShutdownSignal>,
    ) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            group = self.feed.group_id().unwrap_or_default(),
            interval_ms = self.interval.as_millis() as u64,
            "chat poller started"
        );

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("chat poller stopping");
                    break;
                }
                _ = ticker.tick() => {
                    match self.poll_once().await {
                        Ok(messages) => {
                            for message in messages {
                                if tx.send(message).await.is_err() {
                                    debug!("chat receiver dropped");
                                    return;
                                }
                            }
                        }
                        Err(e) => warn!(error = %e, "chat poll failed"),
                    }
                }
            }
        }
    }
}

/// Member names that fit a header line, plus the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSummary {
    pub visible: Vec<String>,
    pub hidden: Vec<String>,
}

impl MemberSummary {
    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }
}

impl fmt::Display for MemberSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.visible.is_empty() && self.hidden.is_empty() {
            return f.write_str("(No members)");
        }
        f.write_str("(")?;
        f.write_str(&self.visible.join(", "))?;
        if !self.hidden.is_empty() {
            if !self.visible.is_empty() {
                f.write_str(", ")?;
            }
            write!(f, "+{} more", self.hidden.len())?;
        }
        f.write_str(")")
    }
}

/// Fit leading `names` into `max_chars`, counting the opening parenthesis
/// and a `", "` separator before every name after the first.
///
/// Stops at the first name that does not fit; later shorter names stay
/// hidden too.
pub fn member_summary<S: AsRef<str>>(names: &[S], max_chars: usize) -> MemberSummary {
    let mut used = 1;
    let mut visible = Vec::new();
    for name in names {
        let name = name.as_ref();
        let extra = name.chars().count() + if visible.is_empty() { 0 } else { 2 };
        if used + extra > max_chars {
            break;
        }
        used += extra;
        visible.push(name.to_string());
    }
    let hidden = names[visible.len()..]
        .iter()
        .map(|n| n.as_ref().to_string())
        .collect();
    MemberSummary { visible, hidden }
}
