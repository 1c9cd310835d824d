//! Protocol module - JSON message types for the relay link
//!
//! Line-delimited JSON. All messages have: type, seq (sequence number), ts
//! (timestamp in ms). Big integers travel as [`Felt`]s: hex strings, decimal
//! strings, or plain JSON numbers are all accepted on input; output is always
//! canonical `0x` hex.

use serde::{Deserialize, Serialize};

use arrayvec::ArrayVec;

use crate::core::snapshot::{normalize_felt, GameSnapshot, PlayerSnapshot};
use crate::core::DecodeError;
use crate::types::Entrypoint;

/// Protocol version spoken by this client
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Upper bound on felts in one `execute`
pub const MAX_CALLDATA: usize = 8;

// ============== Field Types ==============

/// Field element in canonical hex form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Felt(String);

impl Default for Felt {
    fn default() -> Self {
        Felt("0x0".to_string())
    }
}

impl Felt {
    pub fn from_u64(value: u64) -> Self {
        Felt(format!("{value:#x}"))
    }

    /// Parse `0x`-hex or decimal text of any width
    ///
    /// ```
    /// use grimblock_adapter::protocol::Felt;
    ///
    /// assert_eq!(Felt::parse("0x00FF").unwrap().as_str(), "0xff");
    /// assert_eq!(Felt::parse("18446744073709551616").unwrap().as_str(), "0x10000000000000000");
    /// assert!(Felt::parse("12ab").is_none());
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let t = text.trim();
        if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
            if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            Some(Felt(normalize_felt(t)))
        } else if !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()) {
            Some(Felt(format!("0x{}", decimal_to_hex(t))))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == "0x0"
    }

    /// Narrow to `u64`, naming `field` on overflow
    pub fn to_u64(&self, field: &'static str) -> Result<u64, DecodeError> {
        u64::from_str_radix(&self.0[2..], 16).map_err(|_| DecodeError::MalformedField {
            field,
            reason: format!("{} does not fit in 64 bits", self.0),
        })
    }

    pub fn to_u32(&self, field: &'static str) -> Result<u32, DecodeError> {
        let wide = self.to_u64(field)?;
        u32::try_from(wide).map_err(|_| DecodeError::MalformedField {
            field,
            reason: format!("{} does not fit in 32 bits", self.0),
        })
    }
}

/// Decimal digits to lowercase hex digits, no prefix
///
/// Accumulates into little-endian 32-bit limbs so seeds and addresses wider
/// than any native integer survive intact.
fn decimal_to_hex(digits: &str) -> String {
    let mut limbs: Vec<u32> = vec![0];
    for d in digits.bytes() {
        let mut carry = (d - b'0') as u64;
        for limb in limbs.iter_mut() {
            let v = *limb as u64 * 10 + carry;
            *limb = v as u32;
            carry = v >> 32;
        }
        if carry != 0 {
            limbs.push(carry as u32);
        }
    }
    while limbs.len() > 1 && limbs.last() == Some(&0) {
        limbs.pop();
    }

    let mut out = String::with_capacity(limbs.len() * 8);
    let mut high_first = limbs.iter().rev();
    if let Some(top) = high_first.next() {
        out.push_str(&format!("{top:x}"));
    }
    for limb in high_first {
        out.push_str(&format!("{limb:08x}"));
    }
    out
}

impl std::fmt::Display for Felt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Felt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = Felt;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "a hex string, a decimal string or a non-negative integer")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Felt::parse(v).ok_or_else(|| E::custom(format!("invalid felt `{v}`")))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Felt::from_u64(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                u64::try_from(v)
                    .map(Felt::from_u64)
                    .map_err(|_| E::custom("negative felt"))
            }

            fn visit_u128<E>(self, v: u128) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Felt(format!("{v:#x}")))
            }

            // JSON integers past u64 arrive as floats; only exact ones are kept
            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                const MAX_EXACT: f64 = (1u64 << f64::MANTISSA_DIGITS) as f64;
                if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= MAX_EXACT {
                    Ok(Felt::from_u64(v as u64))
                } else {
                    Err(E::custom(format!(
                        "felt {v} is not an exact integer; send wide felts as strings"
                    )))
                }
            }
        }

        deserializer.deserialize_any(V)
    }
}

impl Serialize for Felt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// Accept `true`/`false`, `0`/`1`, or `"0x0"`/`"0x1"` for boolean model fields
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct V;
    impl<'de> serde::de::Visitor<'de> for V {
        type Value = bool;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a boolean or 0/1")
        }

        fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(E::custom("flag out of range")),
            }
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v.eq_ignore_ascii_case("true") {
                return Ok(true);
            }
            if v.eq_ignore_ascii_case("false") {
                return Ok(false);
            }
            match Felt::parse(v) {
                Some(f) if f.is_zero() => Ok(false),
                Some(f) if f.as_str() == "0x1" => Ok(true),
                _ => Err(E::custom(format!("invalid flag `{v}`"))),
            }
        }
    }

    deserializer.deserialize_any(V)
}

/// Contract entrypoint name on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntrypointName(pub Entrypoint);

impl<'de> Deserialize<'de> for EntrypointName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        Entrypoint::from_str(s)
            .map(EntrypointName)
            .ok_or_else(|| serde::de::Error::custom("unknown entrypoint"))
    }
}

impl Serialize for EntrypointName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Calldata(pub ArrayVec<Felt, MAX_CALLDATA>);

impl Calldata {
    /// Build from hex arguments; `None` if one does not parse or there are too many
    pub fn from_args(args: &[String]) -> Option<Self> {
        let mut out = ArrayVec::new();
        for arg in args {
            out.try_push(Felt::parse(arg)?).ok()?;
        }
        Some(Calldata(out))
    }
}

impl<'de> Deserialize<'de> for Calldata {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = Calldata;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "an array of felts")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut out = ArrayVec::<Felt, MAX_CALLDATA>::new();
                while let Some(felt) = seq.next_element::<Felt>()? {
                    out.try_push(felt)
                        .map_err(|_| serde::de::Error::custom("too many calldata felts"))?;
                }
                Ok(Calldata(out))
            }
        }

        deserializer.deserialize_seq(V)
    }
}

impl Serialize for Calldata {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for felt in &self.0 {
            seq.serialize_element(felt)?;
        }
        seq.end()
    }
}

/// Game model as the indexer reports it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireGame {
    pub player_id: Felt,
    pub id: Felt,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub streak: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub over: bool,
    #[serde(default)]
    pub combo: Felt,
    #[serde(default)]
    pub score: Felt,
    #[serde(default)]
    pub pieces: Felt,
    #[serde(default)]
    pub grid: Felt,
    #[serde(default)]
    pub seed: Felt,
}

impl WireGame {
    pub fn to_snapshot(&self) -> Result<GameSnapshot, DecodeError> {
        Ok(GameSnapshot {
            player_id: self.player_id.as_str().to_string(),
            id: self.id.to_u32("id")?,
            streak: self.streak,
            over: self.over,
            combo: self.combo.to_u32("combo")?,
            score: self.score.to_u32("score")?,
            pieces: self.pieces.to_u64("pieces")?,
            grid: self.grid.to_u64("grid")?,
            seed: self.seed.as_str().to_string(),
        })
    }

    pub fn from_snapshot(snapshot: &GameSnapshot) -> Self {
        Self {
            player_id: Felt::parse(&snapshot.player_id).unwrap_or_default(),
            id: Felt::from_u64(snapshot.id as u64),
            streak: snapshot.streak,
            over: snapshot.over,
            combo: Felt::from_u64(snapshot.combo as u64),
            score: Felt::from_u64(snapshot.score as u64),
            pieces: Felt::from_u64(snapshot.pieces),
            grid: Felt::from_u64(snapshot.grid),
            seed: Felt::parse(&snapshot.seed).unwrap_or_default(),
        }
    }
}

/// Player model as the indexer reports it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WirePlayer {
    pub id: Felt,
    #[serde(default)]
    pub name: Felt,
}

impl WirePlayer {
    pub fn to_snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id.as_str().to_string(),
            name: self.name.as_str().to_string(),
        }
    }
}

// ============== Client -> Relay Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HelloType {
    #[serde(rename = "hello")]
    Hello,
}

impl Default for HelloType {
    fn default() -> Self {
        Self::Hello
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecuteType {
    #[serde(rename = "execute")]
    Execute,
}

impl Default for ExecuteType {
    fn default() -> Self {
        Self::Execute
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Client hello (first message on a connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    /// Empty when the relay should pick the account
    #[serde(default)]
    pub player_id: String,
}

/// Submit one contract call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ExecuteType,
    pub seq: u64,
    pub ts: u64,
    pub entrypoint: EntrypointName,
    #[serde(default)]
    pub calldata: Calldata,
}

// ============== Relay -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    #[serde(rename = "game")]
    Game,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerType {
    #[serde(rename = "player")]
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultType {
    #[serde(rename = "result")]
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "handshake_required")]
    HandshakeRequired,
    #[serde(rename = "protocol_mismatch")]
    ProtocolMismatch,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "execution_failed")]
    ExecutionFailed,
    #[serde(rename = "backpressure")]
    Backpressure,
}

/// Welcome (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    /// Account the relay executes for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<Felt>,
}

/// A game model changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMessage {
    #[serde(rename = "type")]
    pub msg_type: GameType,
    pub seq: u64,
    pub ts: u64,
    pub game: WireGame,
}

/// A player model changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerMessage {
    #[serde(rename = "type")]
    pub msg_type: PlayerType,
    pub seq: u64,
    pub ts: u64,
    pub player: WirePlayer,
}

/// Outcome of an `execute`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMessage {
    #[serde(rename = "type")]
    pub msg_type: ResultType,
    pub seq: u64,
    pub ts: u64,
    pub request_seq: u64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<Felt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
    /// The client request this error answers, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_seq: Option<u64>,
}

// ============== Message Parsing ==============

/// Parsed relay message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Welcome(WelcomeMessage),
    Game(GameMessage),
    Player(PlayerMessage),
    Result(ResultMessage),
    Error(ErrorMessage),
    Unknown(UnknownMessage),
}

/// Parsed client message, as a relay sees it
#[derive(Debug, Clone)]
pub enum ParsedRequest {
    Hello(HelloMessage),
    Execute(ExecuteMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// What can still be read from a relay line that failed to parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LenientHeader {
    pub msg_type: String,
    pub seq: u64,
    /// Owner of a `game` record, or the id of a `player` record, normalized
    pub owner: Option<String>,
}

/// Best-effort header of a malformed line; `None` unless it is a JSON object with a type
pub fn parse_lenient_header(json: &str) -> Option<LenientHeader> {
    let value: serde_json::Value = serde_json::from_str(json).ok()?;
    let msg_type = value.get("type")?.as_str()?.to_string();
    let seq = value.get("seq").and_then(|s| s.as_u64()).unwrap_or(0);
    let owner = match msg_type.as_str() {
        "game" => value.get("game").and_then(|g| g.get("player_id")),
        "player" => value.get("player").and_then(|p| p.get("id")),
        _ => None,
    }
    .and_then(|id| match id {
        serde_json::Value::String(s) => Some(Felt::parse(s).map_or_else(|| s.clone(), |f| f.0)),
        serde_json::Value::Number(n) => n.as_u64().map(|v| Felt::from_u64(v).0),
        _ => None,
    });
    Some(LenientHeader {
        msg_type,
        seq,
        owner,
    })
}

/// Unknown message types are not a hard parse error; a bad known one is
fn parse_unknown(
    json: &str,
    known: &[&str],
    err: serde_json::Error,
) -> Result<UnknownMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    struct Header<'a> {
        #[serde(rename = "type")]
        msg_type: Option<&'a str>,
        seq: Option<u64>,
    }
    let header = serde_json::from_str::<Header>(json)?;
    let msg_type = header.msg_type.unwrap_or("unknown");
    if known.contains(&msg_type) {
        return Err(err);
    }
    Ok(UnknownMessage {
        seq: header.seq.unwrap_or(0),
    })
}

/// Parse a relay → client line
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum Inbound {
        #[serde(rename = "welcome")]
        Welcome(WelcomeBody),
        #[serde(rename = "game")]
        Game(GameBody),
        #[serde(rename = "player")]
        Player(PlayerBody),
        #[serde(rename = "result")]
        Result(ResultBody),
        #[serde(rename = "error")]
        Error(ErrorBody),
    }

    // Bodies without the tag field; the tag is consumed by the enum
    #[derive(Debug, Deserialize)]
    struct WelcomeBody {
        seq: u64,
        ts: u64,
        protocol_version: String,
        #[serde(default)]
        player_id: Option<Felt>,
    }
    #[derive(Debug, Deserialize)]
    struct GameBody {
        seq: u64,
        ts: u64,
        game: WireGame,
    }
    #[derive(Debug, Deserialize)]
    struct PlayerBody {
        seq: u64,
        ts: u64,
        player: WirePlayer,
    }
    #[derive(Debug, Deserialize)]
    struct ResultBody {
        seq: u64,
        ts: u64,
        request_seq: u64,
        success: bool,
        #[serde(default)]
        transaction_hash: Option<Felt>,
    }
    #[derive(Debug, Deserialize)]
    struct ErrorBody {
        seq: u64,
        ts: u64,
        code: ErrorCode,
        message: String,
        #[serde(default)]
        request_seq: Option<u64>,
    }

    match serde_json::from_str::<Inbound>(json) {
        Ok(Inbound::Welcome(b)) => Ok(ParsedMessage::Welcome(WelcomeMessage {
            msg_type: WelcomeType::Welcome,
            seq: b.seq,
            ts: b.ts,
            protocol_version: b.protocol_version,
            player_id: b.player_id,
        })),
        Ok(Inbound::Game(b)) => Ok(ParsedMessage::Game(GameMessage {
            msg_type: GameType::Game,
            seq: b.seq,
            ts: b.ts,
            game: b.game,
        })),
        Ok(Inbound::Player(b)) => Ok(ParsedMessage::Player(PlayerMessage {
            msg_type: PlayerType::Player,
            seq: b.seq,
            ts: b.ts,
            player: b.player,
        })),
        Ok(Inbound::Result(b)) => Ok(ParsedMessage::Result(ResultMessage {
            msg_type: ResultType::Result,
            seq: b.seq,
            ts: b.ts,
            request_seq: b.request_seq,
            success: b.success,
            transaction_hash: b.transaction_hash,
        })),
        Ok(Inbound::Error(b)) => Ok(ParsedMessage::Error(ErrorMessage {
            msg_type: ErrorType::Error,
            seq: b.seq,
            ts: b.ts,
            code: b.code,
            message: b.message,
            request_seq: b.request_seq,
        })),
        Err(e) => parse_unknown(json, &["welcome", "game", "player", "result", "error"], e)
            .map(ParsedMessage::Unknown),
    }
}

/// Parse a client → relay line
pub fn parse_request(json: &str) -> Result<ParsedRequest, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum Outbound {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "execute")]
        Execute(ExecuteMessage),
    }

    match serde_json::from_str::<Outbound>(json) {
        Ok(Outbound::Hello(m)) => Ok(ParsedRequest::Hello(m)),
        Ok(Outbound::Execute(m)) => Ok(ParsedRequest::Execute(m)),
        Err(e) => parse_unknown(json, &["hello", "execute"], e).map(ParsedRequest::Unknown),
    }
}

// ============== Utility Functions ==============

pub fn create_hello(seq: u64, client_name: &str, player_id: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: PROTOCOL_VERSION.to_string(),
        player_id: player_id.to_string(),
    }
}

pub fn create_execute(seq: u64, entrypoint: Entrypoint, calldata: Calldata) -> ExecuteMessage {
    ExecuteMessage {
        msg_type: ExecuteType::Execute,
        seq,
        ts: current_timestamp_ms(),
        entrypoint: EntrypointName(entrypoint),
        calldata,
    }
}

pub fn create_welcome(seq: u64, player_id: Option<Felt>) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        player_id,
    }
}

pub fn create_game(seq: u64, game: WireGame) -> GameMessage {
    GameMessage {
        msg_type: GameType::Game,
        seq,
        ts: current_timestamp_ms(),
        game,
    }
}

pub fn create_player(seq: u64, player: WirePlayer) -> PlayerMessage {
    PlayerMessage {
        msg_type: PlayerType::Player,
        seq,
        ts: current_timestamp_ms(),
        player,
    }
}

pub fn create_result(seq: u64, request_seq: u64, success: bool) -> ResultMessage {
    ResultMessage {
        msg_type: ResultType::Result,
        seq,
        ts: current_timestamp_ms(),
        request_seq,
        success,
        transaction_hash: None,
    }
}

pub fn create_error(
    seq: u64,
    code: ErrorCode,
    message: &str,
    request_seq: Option<u64>,
) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
        request_seq,
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
