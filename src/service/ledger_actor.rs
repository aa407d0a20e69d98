use crate::db::{Entry, EntryId, KindTotals, LedgerStorage, NewEntry, UserId};
use crate::error::LedgerError;

use chrono::NaiveDate;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tracing::{debug, info, warn};

type Reply<T> = RpcReplyPort<Result<T, LedgerError>>;

/// Messages handled by the ledger actor. Every variant is an RPC: the
/// caller waits for the storage result on the reply port.
#[derive(Debug)]
pub enum LedgerMessage {
    EnsureUser(String, Reply<UserId>),
    ListUsers(Reply<Vec<String>>),
    AddEntry(NewEntry, Reply<EntryId>),
    ListEntries(String, Reply<Vec<Entry>>),
    /// (user name, start, end) inclusive on both ends.
    SumBetween(String, NaiveDate, NaiveDate, Reply<KindTotals>),
    /// (key, default)
    MetaGet(String, String, Reply<String>),
    /// (key, value)
    MetaSet(String, String, Reply<()>),
}

/// Cloneable handle to the actor that owns the ledger storage. This is the
/// context object passed to everything that reads or writes entries.
#[derive(Clone)]
pub struct LedgerHandle {
    actor: ActorRef<LedgerMessage>,
}

impl LedgerHandle {
    pub async fn ensure_user(&self, name: impl AsRef<str>) -> Result<UserId, LedgerError> {
        ractor::call!(
            self.actor,
            LedgerMessage::EnsureUser,
            name.as_ref().to_string()
        )
        .map_err(|e| LedgerError::ActorError(format!("EnsureUser RPC failed: {e}")))?
    }

    pub async fn list_users(&self) -> Result<Vec<String>, LedgerError> {
        ractor::call!(self.actor, LedgerMessage::ListUsers)
            .map_err(|e| LedgerError::ActorError(format!("ListUsers RPC failed: {e}")))?
    }

    pub async fn add_entry(&self, entry: NewEntry) -> Result<EntryId, LedgerError> {
        ractor::call!(self.actor, LedgerMessage::AddEntry, entry)
            .map_err(|e| LedgerError::ActorError(format!("AddEntry RPC failed: {e}")))?
    }

    pub async fn list_entries_for_user(
        &self,
        user_name: impl AsRef<str>,
    ) -> Result<Vec<Entry>, LedgerError> {
        ractor::call!(
            self.actor,
            LedgerMessage::ListEntries,
            user_name.as_ref().to_string()
        )
        .map_err(|e| LedgerError::ActorError(format!("ListEntries RPC failed: {e}")))?
    }

    pub async fn sum_between(
        &self,
        user_name: impl AsRef<str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<KindTotals, LedgerError> {
        ractor::call!(
            self.actor,
            LedgerMessage::SumBetween,
            user_name.as_ref().to_string(),
            start,
            end
        )
        .map_err(|e| LedgerError::ActorError(format!("SumBetween RPC failed: {e}")))?
    }

    pub async fn meta_get(
        &self,
        key: impl AsRef<str>,
        default: impl AsRef<str>,
    ) -> Result<String, LedgerError> {
        ractor::call!(
            self.actor,
            LedgerMessage::MetaGet,
            key.as_ref().to_string(),
            default.as_ref().to_string()
        )
        .map_err(|e| LedgerError::ActorError(format!("MetaGet RPC failed: {e}")))?
    }

    pub async fn meta_set(
        &self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<(), LedgerError> {
        ractor::call!(
            self.actor,
            LedgerMessage::MetaSet,
            key.as_ref().to_string(),
            value.as_ref().to_string()
        )
        .map_err(|e| LedgerError::ActorError(format!("MetaSet RPC failed: {e}")))?
    }

    /// Stop the actor; the storage pool is closed in `post_stop`.
    pub async fn shutdown(&self) -> Result<(), LedgerError> {
        self.actor
            .stop_and_wait(None, None)
            .await
            .map_err(|e| LedgerError::ActorError(format!("LedgerActor stop failed: {e}")))
    }
}

/// Internal state held by the ractor-driven ledger actor
struct LedgerActorState {
    storage: LedgerStorage,
}

/// ractor-based single owner of the ledger storage
struct LedgerActor;

#[ractor::async_trait]
impl Actor for LedgerActor {
    type Msg = LedgerMessage;
    type State = LedgerActorState;
    type Arguments = LedgerStorage;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        storage: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let users = storage
            .users
            .count_users()
            .await
            .map_err(|e| ActorProcessingErr::from(format!("DB count users failed: {}", e)))?;
        info!("LedgerActor started: {} users on file", users);
        Ok(LedgerActorState { storage })
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        state.storage.close().await;
        debug!("LedgerActor stopped; storage closed");
        Ok(())
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let storage = &state.storage;
        match message {
            LedgerMessage::EnsureUser(name, rp) => {
                let res = storage.users.ensure_user(&name).await;
                respond("EnsureUser", rp, res);
            }
            LedgerMessage::ListUsers(rp) => {
                let res = storage.users.list_users().await;
                respond("ListUsers", rp, res);
            }
            LedgerMessage::AddEntry(entry, rp) => {
                let res = storage.entries.add_entry(&storage.users, &entry).await;
                respond("AddEntry", rp, res);
            }
            LedgerMessage::ListEntries(user_name, rp) => {
                let res = storage.entries.list_entries_for_user(&user_name).await;
                respond("ListEntries", rp, res);
            }
            LedgerMessage::SumBetween(user_name, start, end, rp) => {
                let res = storage.entries.sum_between(&user_name, start, end).await;
                respond("SumBetween", rp, res);
            }
            LedgerMessage::MetaGet(key, default, rp) => {
                let res = storage.meta.get(&key, &default).await;
                respond("MetaGet", rp, res);
            }
            LedgerMessage::MetaSet(key, value, rp) => {
                let res = storage.meta.set(&key, &value).await;
                respond("MetaSet", rp, res);
            }
        }
        Ok(())
    }
}

fn respond<T: Send + 'static>(op: &str, reply_port: Reply<T>, result: Result<T, LedgerError>) {
    if let Err(e) = &result {
        warn!("{op} failed: {}", e);
    }
    if reply_port.send(result).is_err() {
        debug!("{op}: caller dropped the reply port");
    }
}

/// Spawn the ledger actor over an opened storage and return a handle.
pub async fn spawn(storage: LedgerStorage) -> Result<LedgerHandle, LedgerError> {
    let (actor, _jh) = Actor::spawn(None, LedgerActor, storage)
        .await
        .map_err(|e| LedgerError::ActorError(format!("failed to spawn LedgerActor: {e}")))?;
    Ok(LedgerHandle { actor })
}

/// Open the database at `database_url` and spawn the actor that owns it.
pub async fn open(database_url: &str) -> Result<LedgerHandle, LedgerError> {
    let storage = LedgerStorage::open(database_url).await?;
    spawn(storage).await
}
