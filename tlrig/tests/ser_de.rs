//! Engine tests against byte-exact wire sequences.
//!
//! Fixture schema:
//!
//! ```text
//! user#d23c81a3 id:int first_name:string last_name:string key:bytes = User;
//! no_user#c67599d1 id:int = User;
//! probe#a1b2c3d4 flag:Bool factor:double count:int counts:Vector<int>
//!     big:long title:string nonce:int128 fingerprint:int256
//!     users:Vector<User> raw_counts:vector<int> extra:Object = Probe;
//! getUsers#2d84d5f5 ids:Vector<int> = Vector<User>;
//! ```

use std::any::{Any, TypeId};
use std::sync::Arc;

use tlrig::{
    BoxedAny, ByteOrder, Context, EnumSerializer, Error, FieldDescriptor, Int128, Int256, Mode,
    Registry, Result, Rig, Serializer, Streamer,
};

const USER_ID: u32 = 0xd23c81a3;
const NO_USER_ID: u32 = 0xc67599d1;
const PROBE_ID: u32 = 0xa1b2c3d4;
const GET_USERS_ID: u32 = 0x2d84d5f5;
const VECTOR_ID: u32 = 0x1cb5c415;
const INT_ID: u32 = 0xa8509bda;
const BOOL_TRUE_ID: u32 = 0x997275b5;
const BOOL_FALSE_ID: u32 = 0xbc799737;

#[derive(Clone, Debug, Default, PartialEq)]
struct User {
    id: i32,
    first_name: String,
    last_name: String,
    key: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct NoUser {
    id: i32,
}

#[derive(Clone, Debug, PartialEq)]
enum AnyUser {
    User(User),
    NoUser(NoUser),
}

#[derive(Debug)]
struct Probe {
    flag: bool,
    factor: f64,
    count: i32,
    counts: Vec<i32>,
    big: i64,
    title: String,
    nonce: Int128,
    fingerprint: Int256,
    users: Vec<AnyUser>,
    raw_counts: Vec<i32>,
    extra: BoxedAny,
}

impl Default for Probe {
    fn default() -> Self {
        Self {
            flag: false,
            factor: 0.0,
            count: 0,
            counts: Vec::new(),
            big: 0,
            title: String::new(),
            nonce: Int128::default(),
            fingerprint: Int256::default(),
            users: Vec::new(),
            raw_counts: Vec::new(),
            extra: Box::new(0i32),
        }
    }
}

impl PartialEq for Probe {
    fn eq(&self, other: &Self) -> bool {
        self.flag == other.flag
            && self.factor.to_bits() == other.factor.to_bits()
            && self.count == other.count
            && self.counts == other.counts
            && self.big == other.big
            && self.title == other.title
            && self.nonce == other.nonce
            && self.fingerprint == other.fingerprint
            && self.users == other.users
            && self.raw_counts == other.raw_counts
            && self.extra.downcast_ref::<i32>() == other.extra.downcast_ref::<i32>()
    }
}

#[derive(Debug, Default, PartialEq)]
struct GetUsers {
    ids: Vec<i32>,
}

fn build_rig() -> Rig {
    let mut registry = Registry::new();

    registry
        .register_object(
            USER_ID,
            "user",
            vec![
                FieldDescriptor::new(1, |u: &User| &u.id, |u, v| u.id = v),
                FieldDescriptor::new(2, |u: &User| &u.first_name, |u, v| u.first_name = v),
                FieldDescriptor::new(3, |u: &User| &u.last_name, |u, v| u.last_name = v),
                FieldDescriptor::new(4, |u: &User| &u.key, |u, v| u.key = v),
            ],
        )
        .unwrap();

    registry
        .register_object(
            NO_USER_ID,
            "noUser",
            vec![FieldDescriptor::new(1, |u: &NoUser| &u.id, |u, v| u.id = v)],
        )
        .unwrap();

    registry
        .register_enum(
            EnumSerializer::<AnyUser>::new("User")
                .variant::<User>(
                    |u| match u {
                        AnyUser::User(x) => Some(x),
                        _ => None,
                    },
                    AnyUser::User,
                )
                .variant::<NoUser>(
                    |u| match u {
                        AnyUser::NoUser(x) => Some(x),
                        _ => None,
                    },
                    AnyUser::NoUser,
                ),
        )
        .unwrap();

    registry
        .register_object(
            PROBE_ID,
            "probe",
            vec![
                FieldDescriptor::new(1, |p: &Probe| &p.flag, |p, v| p.flag = v),
                FieldDescriptor::new(2, |p: &Probe| &p.factor, |p, v| p.factor = v),
                FieldDescriptor::new(3, |p: &Probe| &p.count, |p, v| p.count = v),
                FieldDescriptor::new(4, |p: &Probe| &p.counts, |p, v| p.counts = v),
                FieldDescriptor::new(5, |p: &Probe| &p.big, |p, v| p.big = v),
                FieldDescriptor::new(6, |p: &Probe| &p.title, |p, v| p.title = v),
                FieldDescriptor::new(7, |p: &Probe| &p.nonce, |p, v| p.nonce = v),
                FieldDescriptor::new(8, |p: &Probe| &p.fingerprint, |p, v| p.fingerprint = v),
                FieldDescriptor::new(9, |p: &Probe| &p.users, |p, v| p.users = v),
                FieldDescriptor::with_mode(
                    10,
                    Mode::Bare,
                    |p: &Probe| &p.raw_counts,
                    |p, v| p.raw_counts = v,
                ),
                FieldDescriptor::dynamic(11, |p: &Probe| &p.extra, |p, v| p.extra = v),
            ],
        )
        .unwrap();

    registry
        .register_object(
            GET_USERS_ID,
            "getUsers",
            vec![FieldDescriptor::new(1, |g: &GetUsers| &g.ids, |g, v| g.ids = v)],
        )
        .unwrap();

    Rig::new(registry)
}

fn sample_users() -> Vec<AnyUser> {
    vec![
        AnyUser::User(User {
            id: 2,
            first_name: "Pavel".into(),
            last_name: "Durov".into(),
            key: vec![1, 2, 3, 4, 5],
        }),
        AnyUser::NoUser(NoUser { id: 3 }),
        AnyUser::User(User {
            id: 4,
            first_name: "Nikolay".into(),
            last_name: "Durov".into(),
            key: vec![6, 7, 8, 9, 10],
        }),
    ]
}

fn sample_probe() -> Probe {
    Probe {
        flag: true,
        factor: f64::from_bits(1),
        count: i32::MAX,
        counts: vec![1, 2, 3, 4, 5],
        big: i64::MAX,
        title: "PPP".into(),
        nonce: Int128(0x0102030405060708090a0b0c0d0e0f10),
        fingerprint: Int256::new(
            0x0102030405060708090a0b0c0d0e0f10,
            0x1112131415161718191a1b1c1d1e1f20,
        ),
        users: sample_users(),
        raw_counts: vec![9, 99, 999, 9999, 99999, 999999],
        extra: Box::new(9i32),
    }
}

/// Little-endian wire builder for expected byte sequences.
struct Wire(Vec<u8>);

impl Wire {
    fn new() -> Self {
        Self(Vec::new())
    }

    fn u32(mut self, v: u32) -> Self {
        self.0.extend(v.to_le_bytes());
        self
    }

    fn i32(mut self, v: i32) -> Self {
        self.0.extend(v.to_le_bytes());
        self
    }

    fn i64(mut self, v: i64) -> Self {
        self.0.extend(v.to_le_bytes());
        self
    }

    fn u64(mut self, v: u64) -> Self {
        self.0.extend(v.to_le_bytes());
        self
    }

    /// Short-form TL byte string; assumes the stream is 4-byte aligned here.
    fn bytes(mut self, b: &[u8]) -> Self {
        assert!(b.len() <= 253);
        self.0.push(b.len() as u8);
        self.0.extend_from_slice(b);
        while self.0.len() % 4 != 0 {
            self.0.push(0);
        }
        self
    }

    fn str(self, s: &str) -> Self {
        self.bytes(s.as_bytes())
    }

    fn done(self) -> Vec<u8> {
        self.0
    }
}

fn users_wire(w: Wire) -> Wire {
    w.u32(VECTOR_ID)
        .i32(3)
        .u32(USER_ID)
        .i32(2)
        .str("Pavel")
        .str("Durov")
        .bytes(&[1, 2, 3, 4, 5])
        .u32(NO_USER_ID)
        .i32(3)
        .u32(USER_ID)
        .i32(4)
        .str("Nikolay")
        .str("Durov")
        .bytes(&[6, 7, 8, 9, 10])
}

fn probe_wire() -> Vec<u8> {
    let w = Wire::new()
        .u32(PROBE_ID)
        .u32(BOOL_TRUE_ID)
        .u64(1) // f64::from_bits(1)
        .i32(i32::MAX)
        .u32(VECTOR_ID)
        .i32(5)
        .i32(1)
        .i32(2)
        .i32(3)
        .i32(4)
        .i32(5)
        .i64(i64::MAX)
        .str("PPP")
        // int128: low 64-bit word first.
        .u64(0x090a0b0c0d0e0f10)
        .u64(0x0102030405060708)
        // int256: same, lowest word to highest.
        .u64(0x191a1b1c1d1e1f20)
        .u64(0x1112131415161718)
        .u64(0x090a0b0c0d0e0f10)
        .u64(0x0102030405060708);
    users_wire(w)
        .i32(6)
        .i32(9)
        .i32(99)
        .i32(999)
        .i32(9999)
        .i32(99999)
        .i32(999999)
        .u32(INT_ID)
        .i32(9)
        .done()
}

// ── Reference byte sequences ──────────────────────────────────────────────────

#[test]
fn kitchen_sink_matches_reference_bytes() {
    let rig = build_rig();
    let bytes = rig.serialize(&sample_probe()).unwrap();
    assert_eq!(bytes, probe_wire());
}

#[test]
fn kitchen_sink_round_trips() {
    let rig = build_rig();
    let decoded: Probe = rig.deserialize(&probe_wire()).unwrap();
    assert_eq!(decoded, sample_probe());

    let again: Probe = rig.deserialize(&rig.serialize(&decoded).unwrap()).unwrap();
    assert_eq!(again, sample_probe());
}

#[test]
fn polymorphic_vector_matches_reference_bytes() {
    let rig = build_rig();
    let bytes = rig.serialize(&sample_users()).unwrap();
    assert_eq!(bytes, users_wire(Wire::new()).done());
}

#[test]
fn polymorphic_vector_round_trips() {
    let rig = build_rig();
    let bytes = users_wire(Wire::new()).done();
    let decoded: Vec<AnyUser> = rig.deserialize(&bytes).unwrap();
    assert_eq!(decoded, sample_users());
}

#[test]
fn function_object_matches_reference_bytes() {
    let rig = build_rig();
    let call = GetUsers { ids: vec![2, 3, 4] };
    let bytes = rig.serialize(&call).unwrap();
    let expected = Wire::new()
        .u32(GET_USERS_ID)
        .u32(VECTOR_ID)
        .i32(3)
        .i32(2)
        .i32(3)
        .i32(4)
        .done();
    assert_eq!(bytes, expected);
    assert_eq!(rig.deserialize::<GetUsers>(&bytes).unwrap(), call);
}

// ── Primitive dispatch ────────────────────────────────────────────────────────

#[test]
fn top_level_primitives_serialize_bare() {
    let rig = build_rig();
    assert_eq!(rig.serialize(&0x01020304i32).unwrap(), [4, 3, 2, 1]);
    assert_eq!(rig.serialize(&u32::MAX).unwrap(), [0xff; 4]);
    assert_eq!(rig.serialize(&1i64).unwrap(), [1, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(
        rig.serialize(&String::from("Pave")).unwrap(),
        [4, b'P', b'a', b'v', b'e', 0, 0, 0]
    );
    assert_eq!(rig.deserialize::<i32>(&[4, 3, 2, 1]).unwrap(), 0x01020304);
}

#[test]
fn boolean_constructors() {
    let rig = build_rig();
    assert_eq!(rig.serialize(&true).unwrap(), BOOL_TRUE_ID.to_le_bytes());
    assert_eq!(rig.serialize(&false).unwrap(), BOOL_FALSE_ID.to_le_bytes());
    assert!(rig.deserialize::<bool>(&BOOL_TRUE_ID.to_le_bytes()).unwrap());
    assert!(!rig.deserialize::<bool>(&BOOL_FALSE_ID.to_le_bytes()).unwrap());

    let err = rig.deserialize::<bool>(&VECTOR_ID.to_le_bytes()).unwrap_err();
    assert_eq!(err, Error::UnexpectedConstructor { id: VECTOR_ID });
}

#[test]
fn plain_vector_items_stay_bare() {
    let rig = build_rig();
    let bytes = rig.serialize(&vec![7i32, 8]).unwrap();
    let expected = Wire::new().u32(VECTOR_ID).i32(2).i32(7).i32(8).done();
    assert_eq!(bytes, expected);
}

// ── Dynamic dispatch ──────────────────────────────────────────────────────────

#[test]
fn dynamic_deserialize_selects_concrete_type() {
    let rig = build_rig();
    let user = User {
        id: 9,
        first_name: "Alexander".into(),
        last_name: "L".into(),
        key: vec![0, 1, 2, 3, 4, 5],
    };
    let bytes = rig.serialize(&user).unwrap();
    let decoded = rig.deserialize_dynamic(&bytes).unwrap();
    assert_eq!(decoded.downcast_ref::<User>(), Some(&user));
}

#[test]
fn unknown_constructor_fails() {
    let rig = build_rig();
    let err = rig
        .deserialize_dynamic(&0xdeadbeefu32.to_le_bytes())
        .unwrap_err();
    assert_eq!(err, Error::UnexpectedConstructor { id: 0xdeadbeef });
}

#[test]
fn bare_dynamic_read_is_rejected() {
    let rig = build_rig();
    let mut streamer = Streamer::from_bytes(vec![0u8; 8]);
    let err = rig
        .deserialize_from::<BoxedAny>(&mut streamer, Some(Mode::Bare))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOperation { .. }));
}

#[test]
fn heterogeneous_vector_round_trips() {
    let rig = build_rig();
    let user = User {
        id: 9,
        first_name: "Alexander".into(),
        last_name: "L".into(),
        key: vec![0, 1, 2, 3, 4, 5],
    };
    let items: Vec<BoxedAny> = vec![
        Box::new(0x100500i32),
        Box::new(String::from("Something here")),
        Box::new(true),
        Box::new(user.clone()),
        Box::new(NoUser { id: 500 }),
    ];

    let bytes = rig.serialize(&items).unwrap();
    let decoded: Vec<BoxedAny> = rig.deserialize(&bytes).unwrap();

    assert_eq!(decoded.len(), 5);
    assert_eq!(decoded[0].downcast_ref::<i32>(), Some(&0x100500));
    assert_eq!(
        decoded[1].downcast_ref::<String>().map(String::as_str),
        Some("Something here")
    );
    assert_eq!(decoded[2].downcast_ref::<bool>(), Some(&true));
    assert_eq!(decoded[3].downcast_ref::<User>(), Some(&user));
    assert_eq!(decoded[4].downcast_ref::<NoUser>(), Some(&NoUser { id: 500 }));

    // The same bytes resolve dynamically: the vector constructor selects the
    // heterogeneous reader.
    let dynamic = rig.deserialize_dynamic(&bytes).unwrap();
    assert!(dynamic.downcast_ref::<Vec<BoxedAny>>().is_some());
}

// ── Failure paths ─────────────────────────────────────────────────────────────

#[test]
fn unregistered_type_fails() {
    #[derive(Debug, Default)]
    struct Stranger;

    let rig = build_rig();
    let err = rig.serialize(&Stranger).unwrap_err();
    assert!(matches!(err, Error::SerializerNotFound { .. }));
}

#[test]
fn wrong_constructor_for_expected_type() {
    let rig = build_rig();
    let bytes = rig.serialize(&NoUser { id: 3 }).unwrap();
    let err = rig.deserialize::<User>(&bytes).unwrap_err();
    assert_eq!(err, Error::UnexpectedConstructor { id: NO_USER_ID });
}

#[test]
fn truncated_object_fails() {
    let rig = build_rig();
    let full = probe_wire();
    for cut in [3, 7, 20, full.len() / 2, full.len() - 1] {
        let err = rig.deserialize::<Probe>(&full[..cut]).unwrap_err();
        assert_eq!(err, Error::UnexpectedEof, "cut at {cut}");
    }
}

#[test]
fn big_endian_streams_round_trip() {
    let rig = build_rig();
    let user = User {
        id: 1,
        first_name: "John".into(),
        last_name: "Doe".into(),
        key: vec![0, 1, 2, 3, 4, 5],
    };

    let mut streamer = Streamer::new().with_order(ByteOrder::BigEndian);
    rig.serialize_into(&user, &mut streamer, None).unwrap();
    let bytes = streamer.into_bytes();

    // A little-endian read sees a byte-swapped constructor.
    assert!(rig.deserialize::<User>(&bytes).is_err());

    let mut streamer = Streamer::from_bytes(bytes).with_order(ByteOrder::BigEndian);
    assert_eq!(
        rig.deserialize_from::<User>(&mut streamer, None).unwrap(),
        user
    );
}

// ── Field descriptors ─────────────────────────────────────────────────────────

#[test]
fn field_order_indices_define_wire_order() {
    #[derive(Debug, Default, PartialEq)]
    struct Pair {
        low: i32,
        high: i32,
    }

    let mut registry = Registry::new();
    registry
        .register_object(
            0x70616972,
            "pair",
            vec![
                // Declared high-first; order indices put low on the wire first.
                FieldDescriptor::new(2, |p: &Pair| &p.high, |p, v| p.high = v),
                FieldDescriptor::new(1, |p: &Pair| &p.low, |p, v| p.low = v),
            ],
        )
        .unwrap();
    let rig = Rig::new(registry);

    let bytes = rig.serialize(&Pair { low: 1, high: 2 }).unwrap();
    assert_eq!(bytes, Wire::new().u32(0x70616972).i32(1).i32(2).done());
}

#[test]
fn explicit_items_mode_boxes_plain_items() {
    #[derive(Debug, Default, PartialEq)]
    struct Boxy {
        values: Vec<i32>,
    }

    let mut registry = Registry::new();
    registry
        .register_object(
            0x626f7879,
            "boxy",
            vec![FieldDescriptor::vector(
                1,
                None,
                Some(Mode::Boxed),
                |b: &Boxy| &b.values,
                |b, v| b.values = v,
            )],
        )
        .unwrap();
    let rig = Rig::new(registry);

    let value = Boxy { values: vec![5, 6] };
    let bytes = rig.serialize(&value).unwrap();
    let expected = Wire::new()
        .u32(0x626f7879)
        .u32(VECTOR_ID)
        .i32(2)
        .u32(INT_ID)
        .i32(5)
        .u32(INT_ID)
        .i32(6)
        .done();
    assert_eq!(bytes, expected);
    assert_eq!(rig.deserialize::<Boxy>(&bytes).unwrap(), value);
}

// ── Custom serializers ────────────────────────────────────────────────────────

/// A hand-written serializer: fields on the wire in a custom order.
#[derive(Clone, Debug, Default, PartialEq)]
struct Token {
    issued: i64,
    attempts: i32,
    secret: String,
}

struct TokenSerializer;

const TOKEN_ID: u32 = 0x1f2e3d4c;

impl Serializer for TokenSerializer {
    fn constructor_id(&self) -> u32 {
        TOKEN_ID
    }

    fn supported_type(&self) -> TypeId {
        TypeId::of::<Token>()
    }

    fn type_name(&self) -> &str {
        "token"
    }

    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()> {
        let token = value.downcast_ref::<Token>().expect("token value");
        ctx.streamer.write_i32(token.attempts);
        ctx.streamer.write_i64(token.issued);
        ctx.streamer.write_tl_bytes(token.secret.as_bytes())
    }

    fn read_body(&self, _id: u32, ctx: &mut Context<'_>) -> Result<BoxedAny> {
        let attempts = ctx.streamer.read_i32()?;
        let issued = ctx.streamer.read_i64()?;
        let secret = String::from_utf8(ctx.streamer.read_tl_bytes()?).expect("utf-8 secret");
        Ok(Box::new(Token {
            issued,
            attempts,
            secret,
        }))
    }
}

#[test]
fn custom_serializer_round_trips() {
    let mut registry = Registry::new();
    registry.register(Arc::new(TokenSerializer)).unwrap();
    let rig = Rig::new(registry);

    let token = Token {
        issued: 100500,
        attempts: 9,
        secret: "Does anybody really know the secret?".into(),
    };
    let bytes = rig.serialize(&token).unwrap();
    assert_eq!(&bytes[..4], TOKEN_ID.to_le_bytes());
    assert_eq!(rig.deserialize::<Token>(&bytes).unwrap(), token);

    let dynamic = rig.deserialize_dynamic(&bytes).unwrap();
    assert_eq!(dynamic.downcast_ref::<Token>(), Some(&token));
}
