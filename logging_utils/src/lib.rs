use std::collections::BTreeMap;
use std::fmt;

pub use log::Level;

/// Target used by every event emitted through this crate, so that
/// `RUST_LOG=omc_maze=trace` selects the whole exploration trace.
pub const LOG_TARGET: &str = "omc_maze";

///The events this level should be used for are:
/// function call (and finish if it is relevant) and parameters.
pub const LOG_FN_CALL_CHNL: Channel = Channel::Debug;
/// every operation that it useful to log inside a function
/// such as to log changes made to the maps, and every explorer to oracle request
pub const LOG_FN_INT_OPERATIONS: Channel = Channel::Trace;
///The events this level should be used for are:
///Run start, target reached, master map merged, session start/stop
pub const LOG_ACTORS_ACTIVITY: Channel = Channel::Info;

/// The actors that can appear as sender or receiver of a [`LogEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorType {
    Explorer,
    MapBuilder,
    Graph,
    Oracle,
    Session,
}

/// What kind of event is being logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    InternalExplorerAction,
    InternalMapBuilderAction,
    InternalGraphAction,
    InternalOracleAction,
    InternalSessionAction,
    MessageExplorerToOracle,
}

impl EventType {
    /// Returns the self-directed event type of an actor.
    pub fn internal(actor: ActorType) -> Self {
        match actor {
            ActorType::Explorer => EventType::InternalExplorerAction,
            ActorType::MapBuilder => EventType::InternalMapBuilderAction,
            ActorType::Graph => EventType::InternalGraphAction,
            ActorType::Oracle => EventType::InternalOracleAction,
            ActorType::Session => EventType::InternalSessionAction,
        }
    }
}

/// Severity channel of an event, mapped onto the `log` levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

impl Channel {
    pub fn level(self) -> Level {
        match self {
            Channel::Error => Level::Error,
            Channel::Warning => Level::Warn,
            Channel::Info => Level::Info,
            Channel::Debug => Level::Debug,
            Channel::Trace => Level::Trace,
        }
    }
}

/// An actor taking part in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Participant {
    pub actor_type: ActorType,
    pub id: u32,
}

impl Participant {
    pub fn new(actor_type: ActorType, id: u32) -> Self {
        Self { actor_type, id }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.actor_type, self.id)
    }
}

/// A structured log event.
///
/// The payload is an ordered key/value map so that the same event always
/// renders the same way, which keeps traces diffable between runs.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub sender: Option<Participant>,
    pub receiver: Option<Participant>,
    pub event_type: EventType,
    pub channel: Channel,
    pub payload: BTreeMap<String, String>,
}

impl LogEvent {
    pub fn new(
        sender: Option<Participant>,
        receiver: Option<Participant>,
        event_type: EventType,
        channel: Channel,
        payload: BTreeMap<String, String>,
    ) -> Self {
        Self {
            sender,
            receiver,
            event_type,
            channel,
            payload,
        }
    }

    /// Creates an event whose sender and receiver are the same actor.
    pub fn self_directed(
        actor: Participant,
        event_type: EventType,
        channel: Channel,
        payload: BTreeMap<String, String>,
    ) -> Self {
        Self::new(Some(actor), Some(actor), event_type, channel, payload)
    }

    /// Forwards the event to the `log` facade.
    pub fn emit(&self) {
        log::log!(target: LOG_TARGET, self.channel.level(), "{}", self);
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.sender, self.receiver) {
            (Some(from), Some(to)) if from == to => write!(f, "[{}]", from)?,
            (Some(from), Some(to)) => write!(f, "[{} -> {}]", from, to)?,
            (Some(from), None) => write!(f, "[{}]", from)?,
            (None, Some(to)) => write!(f, "[-> {}]", to)?,
            (None, None) => write!(f, "[-]")?,
        }
        write!(f, " {:?} {{", self.event_type)?;
        for (i, (key, val)) in self.payload.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}={}", key, val)?;
        }
        write!(f, " }}")
    }
}

// ---------------------------------------------------------------------------------------
// LOG Macros
// ---------------------------------------------------------------------------------------

/// Creates a BTreeMap payload from key-value pairs for use in log events.
///
/// This macro simplifies the creation of structured metadata for logging by automatically
/// converting keys and values to strings and inserting them into a BTreeMap.
///
/// # Example usage
/// ```
/// use logging_utils::payload;
/// let node = "B";
/// let data = payload!(
///     "arrival" => "new node",
///     "node" => node,
///     "x" => 1,
/// );
/// assert_eq!(data.len(), 3);
/// ```
///
/// # Arguments
/// * `$key => $val` - Any number of key-value pairs where both key and val will be converted to String
#[macro_export] //make this macro visible outside
macro_rules! payload {
    ($($key:expr => $val:expr),* $(,)?) => {{
        let mut p = std::collections::BTreeMap::new();
        $(
            p.insert($key.to_string(), $val.to_string());
        )*
        p
    }};
}

/// Generates a standardized payload for warnings about rejected operations.
///
/// # Usage
/// ```
/// use logging_utils::warning_payload;
/// let name = "A";
/// let p = warning_payload!("node already present", "nothing done", "add_node()", name; "graph" => "master");
/// assert_eq!(p["name"], "\"A\"");
/// ```
///
/// # Arguments
/// * `$warn` - High-level warning category or message
/// * `$err` - The specific error value or reason
/// * `$func` - Name of the function where the problem was detected
/// * `$param` - Zero or more variable identifiers to capture (will be Debug-formatted)
/// * `$key => $val` - Optional additional key-value pairs (after semicolon)
#[macro_export]
macro_rules! warning_payload {
    ($warn:expr, $err:expr, $func:expr $(,$param:ident )*$(; $($key:expr => $val:expr),*)?) => {{
        let mut p = std::collections::BTreeMap::new();

        p.insert("Warning".to_string(), $warn.to_string());
        p.insert("returned error".to_string(), $err.to_string());
        p.insert("fn".to_string(), $func.to_string());

        // adds every argument
        $(
            p.insert(
                stringify!($param).to_string(),
                format!("{:?}", $param)
            );
        )*
        // generic key-value
        $($(
            p.insert($key.to_string(), $val.to_string());
        )*)?

        p
    }};
}

/// Logs internal actor actions and state changes.
///
/// It supports two modes: one using `self` to automatically extract actor info, and a
/// direct mode where actor type and ID are explicitly provided.
///
/// # Usage
/// ```ignore
/// // Using self (e.g., inside the MapBuilder)
/// log_internal_op!(self, "arrival" => "new node", "node" => name);
/// log_internal_op!(self, "run reset");
///
/// // Direct mode (e.g., logging for the graph, which is not an actor on its own)
/// log_internal_op!(dir ActorType::Graph, 0, "action" => "arc added", "arc" => arc_name);
/// ```
///
/// # Channel
/// Logs to LOG_FN_INT_OPERATIONS (Trace level)
#[macro_export]
macro_rules! log_internal_op {
    // direct. requires ActorType and ID
    (dir $actor:expr, $id:expr, $($key:expr => $val:expr),* $(,)? ) => {{
        $crate::LogEvent::self_directed(
            $crate::Participant::new($actor, $id),
            $crate::EventType::internal($actor),
            $crate::LOG_FN_INT_OPERATIONS,
            $crate::payload!( $($key => $val),* )
        ).emit();
    }};

    // requires self
    ($self:ident,  $($key:expr => $val:expr),* $(,)? ) => {{
        $crate::log_internal_op!(dir $self.actor_type(), $self.actor_id(), $($key => $val),* )
    }};

    // single message (require self)
    ($self:ident, $msg:expr) => {
        $crate::log_internal_op!($self, "action" => $msg );
    };
}

/// Records function execution, input arguments and, optionally, the result.
///
/// # Usage Patterns
/// ```ignore
/// // Simple: just function name and parameters
/// log_fn_call!(self, "record_and_connect()", exits);
///
/// // With metadata
/// log_fn_call!(self, "go()", direction; "x" => self.x, "y" => self.y);
///
/// // With result and post-execution metadata
/// log_fn_call!(self, "run_once()"; result = report, "moves" => moves);
///
/// // Direct mode (without self)
/// log_fn_call!(dir ActorType::Graph, 0, "add_arc()", a, b; result = added);
/// ```
///
/// # Channel
/// Logs to LOG_FN_CALL_CHNL (Debug level)
#[macro_export]
macro_rules! log_fn_call {
    // dir: result = ... , post-kvs
    (dir $actor:expr, $id:expr, $fn_name:expr $(, $param:ident)* ;
        result = $result:expr $(, $($post_k:expr => $post_v:expr),* )? $(,)?
    ) => {{
        let mut p = std::collections::BTreeMap::new();
        p.insert("fn".to_string(), $fn_name.to_string());

        $(
            p.insert(stringify!($param).to_string(), format!("{:?}", $param));
        )*

        p.insert("Result".to_string(), format!("{}", $result));

        $(
            $(
                p.insert($post_k.to_string(), $post_v.to_string());
            )*
        )?

        $crate::LogEvent::self_directed(
            $crate::Participant::new($actor, $id),
            $crate::EventType::internal($actor),
            $crate::LOG_FN_CALL_CHNL,
            p
        ).emit();
    }};

    // dir: only kvs (no result)
    (dir $actor:expr, $id:expr, $fn_name:expr $(, $param:ident)* ;
        $($pre_k:expr => $pre_v:expr),+ $(,)?
    ) => {{
        let mut p = std::collections::BTreeMap::new();
        p.insert("fn".to_string(), $fn_name.to_string());

        $(
            p.insert(stringify!($param).to_string(), format!("{:?}", $param));
        )*

        $(
            p.insert($pre_k.to_string(), $pre_v.to_string());
        )+

        $crate::LogEvent::self_directed(
            $crate::Participant::new($actor, $id),
            $crate::EventType::internal($actor),
            $crate::LOG_FN_CALL_CHNL,
            p
        ).emit();
    }};

    // dir: no kvs/result
    (dir $actor:expr, $id:expr, $fn_name:expr $(, $param:ident)* $(,)?) => {{
        let mut p = std::collections::BTreeMap::new();
        p.insert("fn".to_string(), $fn_name.to_string());

        $(
            p.insert(stringify!($param).to_string(), format!("{:?}", $param));
        )*

        $crate::LogEvent::self_directed(
            $crate::Participant::new($actor, $id),
            $crate::EventType::internal($actor),
            $crate::LOG_FN_CALL_CHNL,
            p
        ).emit();
    }};

    // ----- self forms -----
    ($self:ident, $fn_name:expr $(, $param:ident)* ;
        result = $result:expr $(, $($post_k:expr => $post_v:expr),* )? $(,)?
    ) => {{
        $crate::log_fn_call!(
            dir $self.actor_type(),
            $self.actor_id(),
            $fn_name $(, $param)* ;
            result = $result $(, $($post_k => $post_v),* )?
        )
    }};

    ($self:ident, $fn_name:expr $(, $param:ident)* ;
        $($pre_k:expr => $pre_v:expr),+ $(,)?
    ) => {{
        $crate::log_fn_call!(
            dir $self.actor_type(),
            $self.actor_id(),
            $fn_name $(, $param)* ;
            $($pre_k => $pre_v),+
        )
    }};

    ($self:ident, $fn_name:expr $(, $param:ident)* $(,)?) => {{
        $crate::log_fn_call!(
            dir $self.actor_type(),
            $self.actor_id(),
            $fn_name $(, $param)*
        )
    }};
}

/// Logs run-level milestones (run started, target reached, map merged).
///
/// # Channel
/// Logs to LOG_ACTORS_ACTIVITY (Info level)
#[macro_export]
macro_rules! log_activity {
    (dir $actor:expr, $id:expr, $($key:expr => $val:expr),* $(,)? ) => {{
        $crate::LogEvent::self_directed(
            $crate::Participant::new($actor, $id),
            $crate::EventType::internal($actor),
            $crate::LOG_ACTORS_ACTIVITY,
            $crate::payload!( $($key => $val),* )
        ).emit();
    }};

    ($self:ident, $($key:expr => $val:expr),* $(,)? ) => {{
        $crate::log_activity!(dir $self.actor_type(), $self.actor_id(), $($key => $val),* )
    }};
}

/// Logs a rejected operation on the Warning channel.
///
/// The payload is usually built with [`warning_payload!`].
///
/// ```ignore
/// log_warning!(dir ActorType::Graph, 0, warning_payload!("arc already present", "nothing done", "add_arc()", name));
/// ```
#[macro_export]
macro_rules! log_warning {
    (dir $actor:expr, $id:expr, $payload:expr $(,)?) => {{
        $crate::LogEvent::self_directed(
            $crate::Participant::new($actor, $id),
            $crate::EventType::internal($actor),
            $crate::Channel::Warning,
            $payload
        ).emit();
    }};

    ($self:ident, $payload:expr $(,)?) => {{
        $crate::log_warning!(dir $self.actor_type(), $self.actor_id(), $payload)
    }};
}

/// Traces communication between different actors.
///
/// * `$from_actor / $from_id` - the source of the message
/// * `$to_actor / $to_id` - the intended recipient
/// * `$event_type` - the nature of the event
/// * `$message` - the content or identifier of the message sent/received
#[macro_export]
macro_rules! log_message {
    (
        $from_actor:expr, $from_id:expr,
        $to_actor:expr, $to_id:expr,
        $event_type:expr,
        $message:expr
        $(, $param:ident)*
        $(; $($key:expr => $val:expr),*)?
        $(,)?
    ) => {{
        let mut p = std::collections::BTreeMap::new();
        p.insert("message".to_string(), $message.to_string());

        // adding parameters
        $(
            p.insert(
                stringify!($param).to_string(),
                format!("{:?}", $param)
            );
        )*

        // generic key-value pairs
        $($(
            p.insert($key.to_string(), $val.to_string());
        )*)?

        let event = $crate::LogEvent::new(
            Some($crate::Participant::new($from_actor, $from_id)),
            Some($crate::Participant::new($to_actor, $to_id)),
            $event_type,
            $crate::LOG_FN_INT_OPERATIONS,
            p
        );
        event.emit();
    }};
}

#[cfg(feature = "debug-prints")]
#[macro_export]
macro_rules! debug_println {
    ($($arg:tt)*) => { println!($($arg)*) };
}

#[cfg(not(feature = "debug-prints"))]
#[macro_export]
macro_rules! debug_println {
    ($($arg:tt)*) => {
        ()
    };
}

/// Implemented by every component that logs through the `self` forms of the macros.
pub trait LoggableActor {
    fn actor_type(&self) -> ActorType;
    fn actor_id(&self) -> u32;
}
