//! The opcode manifest: every built-in instruction and its fixed number.
//!
//! Numbers are part of the binary contract with compiled scripts. A number,
//! once assigned within a segment, is never reassigned; new instructions
//! take unused numbers. Segment 2 has no built-in instructions and is left
//! to host extensions.

use crate::segment::Segment;

/// A built-in instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Segment 0
    /// Push the immediate as an integer.
    PushInt,
    /// Move the program counter forward by `arg - 1`.
    JumpForward,
    /// Move the program counter backward by `arg + 1`.
    JumpBackward,

    // Segment 3
    /// Show a message box with `arg` buttons.
    MessageBox,

    // Segment 5: locals, literals and coercions
    StoreLocalShort,
    StoreLocalLong,
    StoreLocalFloat,
    /// Convert the top integer to a float.
    IntToFloat,
    /// Replace the top integer (a literal index) with the integer literal.
    FetchIntLiteral,
    /// Replace the top integer (a literal index) with the float literal.
    FetchFloatLiteral,
    /// Convert the top float to an integer.
    FloatToInt,
    NegateInt,
    NegateFloat,

    // Segment 5: arithmetic
    AddInt,
    AddFloat,
    SubInt,
    SubFloat,
    MulInt,
    MulFloat,
    DivInt,
    DivFloat,
    /// Convert the second integer from the top to a float.
    IntToFloat1,
    /// Convert the second float from the top to an integer.
    FloatToInt1,
    SquareRoot,

    // Segment 5: control flow and local fetch
    /// End the current frame.
    Return,
    FetchLocalShort,
    FetchLocalLong,
    FetchLocalFloat,
    /// Pop an integer; skip the next instruction if it is zero.
    SkipZero,
    /// Pop an integer; skip the next instruction if it is nonzero.
    SkipNonZero,

    // Segment 5: comparison
    EqualInt,
    NotEqualInt,
    LessInt,
    LessOrEqualInt,
    GreaterInt,
    GreaterOrEqualInt,
    EqualFloat,
    NotEqualFloat,
    LessFloat,
    LessOrEqualFloat,
    GreaterFloat,
    GreaterOrEqualFloat,

    // Segment 5: globals and host queries
    MenuMode,
    StoreGlobalShort,
    StoreGlobalLong,
    StoreGlobalFloat,
    FetchGlobalShort,
    FetchGlobalLong,
    FetchGlobalFloat,
    Random,
    ScriptRunning,
    StartScript,
    StopScript,
    GetDistance,
    GetSecondsPassed,
    Enable,
    Disable,
    GetDisabled,
    EnableExplicit,
    DisableExplicit,
    GetDisabledExplicit,
    GetDistanceExplicit,
    Report,

    // Segment 5: members of a reference's local script
    StoreMemberShort,
    StoreMemberLong,
    StoreMemberFloat,
    FetchMemberShort,
    FetchMemberLong,
    FetchMemberFloat,

    // Segment 5: members of a global script
    StoreGlobalMemberShort,
    StoreGlobalMemberLong,
    StoreGlobalMemberFloat,
    FetchGlobalMemberShort,
    FetchGlobalMemberLong,
    FetchGlobalMemberFloat,

    StartScriptExplicit,
}

/// All manifest opcodes, segment 0 first, then 3, then 5 in numeric order.
pub const ALL_OPCODES: [Opcode; 76] = [
    Opcode::PushInt,
    Opcode::JumpForward,
    Opcode::JumpBackward,
    Opcode::MessageBox,
    Opcode::StoreLocalShort,
    Opcode::StoreLocalLong,
    Opcode::StoreLocalFloat,
    Opcode::IntToFloat,
    Opcode::FetchIntLiteral,
    Opcode::FetchFloatLiteral,
    Opcode::FloatToInt,
    Opcode::NegateInt,
    Opcode::NegateFloat,
    Opcode::AddInt,
    Opcode::AddFloat,
    Opcode::SubInt,
    Opcode::SubFloat,
    Opcode::MulInt,
    Opcode::MulFloat,
    Opcode::DivInt,
    Opcode::DivFloat,
    Opcode::IntToFloat1,
    Opcode::FloatToInt1,
    Opcode::SquareRoot,
    Opcode::Return,
    Opcode::FetchLocalShort,
    Opcode::FetchLocalLong,
    Opcode::FetchLocalFloat,
    Opcode::SkipZero,
    Opcode::SkipNonZero,
    Opcode::EqualInt,
    Opcode::NotEqualInt,
    Opcode::LessInt,
    Opcode::LessOrEqualInt,
    Opcode::GreaterInt,
    Opcode::GreaterOrEqualInt,
    Opcode::EqualFloat,
    Opcode::NotEqualFloat,
    Opcode::LessFloat,
    Opcode::LessOrEqualFloat,
    Opcode::GreaterFloat,
    Opcode::GreaterOrEqualFloat,
    Opcode::MenuMode,
    Opcode::StoreGlobalShort,
    Opcode::StoreGlobalLong,
    Opcode::StoreGlobalFloat,
    Opcode::FetchGlobalShort,
    Opcode::FetchGlobalLong,
    Opcode::FetchGlobalFloat,
    Opcode::Random,
    Opcode::ScriptRunning,
    Opcode::StartScript,
    Opcode::StopScript,
    Opcode::GetDistance,
    Opcode::GetSecondsPassed,
    Opcode::Enable,
    Opcode::Disable,
    Opcode::GetDisabled,
    Opcode::EnableExplicit,
    Opcode::DisableExplicit,
    Opcode::GetDisabledExplicit,
    Opcode::GetDistanceExplicit,
    Opcode::Report,
    Opcode::StoreMemberShort,
    Opcode::StoreMemberLong,
    Opcode::StoreMemberFloat,
    Opcode::FetchMemberShort,
    Opcode::FetchMemberLong,
    Opcode::FetchMemberFloat,
    Opcode::StoreGlobalMemberShort,
    Opcode::StoreGlobalMemberLong,
    Opcode::StoreGlobalMemberFloat,
    Opcode::FetchGlobalMemberShort,
    Opcode::FetchGlobalMemberLong,
    Opcode::FetchGlobalMemberFloat,
    Opcode::StartScriptExplicit,
];

impl Opcode {
    /// The segment this opcode is registered in.
    pub fn segment(self) -> Segment {
        match self {
            Opcode::PushInt | Opcode::JumpForward | Opcode::JumpBackward => Segment::Zero,
            Opcode::MessageBox => Segment::Three,
            _ => Segment::Five,
        }
    }

    /// The opcode number within its segment.
    pub fn code(self) -> u32 {
        match self {
            Opcode::PushInt => 0,
            Opcode::JumpForward => 1,
            Opcode::JumpBackward => 2,

            Opcode::MessageBox => 0,

            Opcode::StoreLocalShort => 0,
            Opcode::StoreLocalLong => 1,
            Opcode::StoreLocalFloat => 2,
            Opcode::IntToFloat => 3,
            Opcode::FetchIntLiteral => 4,
            Opcode::FetchFloatLiteral => 5,
            Opcode::FloatToInt => 6,
            Opcode::NegateInt => 7,
            Opcode::NegateFloat => 8,
            Opcode::AddInt => 9,
            Opcode::AddFloat => 10,
            Opcode::SubInt => 11,
            Opcode::SubFloat => 12,
            Opcode::MulInt => 13,
            Opcode::MulFloat => 14,
            Opcode::DivInt => 15,
            Opcode::DivFloat => 16,
            Opcode::IntToFloat1 => 17,
            Opcode::FloatToInt1 => 18,
            Opcode::SquareRoot => 19,
            Opcode::Return => 20,
            Opcode::FetchLocalShort => 21,
            Opcode::FetchLocalLong => 22,
            Opcode::FetchLocalFloat => 23,
            Opcode::SkipZero => 24,
            Opcode::SkipNonZero => 25,
            Opcode::EqualInt => 26,
            Opcode::NotEqualInt => 27,
            Opcode::LessInt => 28,
            Opcode::LessOrEqualInt => 29,
            Opcode::GreaterInt => 30,
            Opcode::GreaterOrEqualInt => 31,
            Opcode::EqualFloat => 32,
            Opcode::NotEqualFloat => 33,
            Opcode::LessFloat => 34,
            Opcode::LessOrEqualFloat => 35,
            Opcode::GreaterFloat => 36,
            Opcode::GreaterOrEqualFloat => 37,
            Opcode::MenuMode => 38,
            Opcode::StoreGlobalShort => 39,
            Opcode::StoreGlobalLong => 40,
            Opcode::StoreGlobalFloat => 41,
            Opcode::FetchGlobalShort => 42,
            Opcode::FetchGlobalLong => 43,
            Opcode::FetchGlobalFloat => 44,
            Opcode::Random => 45,
            Opcode::ScriptRunning => 46,
            Opcode::StartScript => 47,
            Opcode::StopScript => 48,
            Opcode::GetDistance => 49,
            Opcode::GetSecondsPassed => 50,
            Opcode::Enable => 51,
            Opcode::Disable => 52,
            Opcode::GetDisabled => 53,
            Opcode::EnableExplicit => 54,
            Opcode::DisableExplicit => 55,
            Opcode::GetDisabledExplicit => 56,
            Opcode::GetDistanceExplicit => 57,
            Opcode::Report => 58,
            Opcode::StoreMemberShort => 59,
            Opcode::StoreMemberLong => 60,
            Opcode::StoreMemberFloat => 61,
            Opcode::FetchMemberShort => 62,
            Opcode::FetchMemberLong => 63,
            Opcode::FetchMemberFloat => 64,
            Opcode::StoreGlobalMemberShort => 65,
            Opcode::StoreGlobalMemberLong => 66,
            Opcode::StoreGlobalMemberFloat => 67,
            Opcode::FetchGlobalMemberShort => 68,
            Opcode::FetchGlobalMemberLong => 69,
            Opcode::FetchGlobalMemberFloat => 70,
            Opcode::StartScriptExplicit => 71,
        }
    }

    /// Whether the instruction takes an immediate argument.
    pub fn has_arg(self) -> bool {
        self.segment().has_arg()
    }

    /// Find the manifest opcode registered at `code` in `segment`.
    pub fn lookup(segment: Segment, code: u32) -> Option<Opcode> {
        ALL_OPCODES
            .iter()
            .find(|op| op.segment() == segment && op.code() == code)
            .copied()
    }

    /// Find a manifest opcode by its assembly mnemonic (case-sensitive,
    /// upper case).
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic() == mnemonic)
            .copied()
    }

    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::PushInt => "PUSH_INT",
            Opcode::JumpForward => "JUMP_FORWARD",
            Opcode::JumpBackward => "JUMP_BACKWARD",
            Opcode::MessageBox => "MESSAGE_BOX",
            Opcode::StoreLocalShort => "STORE_LOCAL_SHORT",
            Opcode::StoreLocalLong => "STORE_LOCAL_LONG",
            Opcode::StoreLocalFloat => "STORE_LOCAL_FLOAT",
            Opcode::IntToFloat => "INT_TO_FLOAT",
            Opcode::FetchIntLiteral => "FETCH_INT_LITERAL",
            Opcode::FetchFloatLiteral => "FETCH_FLOAT_LITERAL",
            Opcode::FloatToInt => "FLOAT_TO_INT",
            Opcode::NegateInt => "NEGATE_INT",
            Opcode::NegateFloat => "NEGATE_FLOAT",
            Opcode::AddInt => "ADD_INT",
            Opcode::AddFloat => "ADD_FLOAT",
            Opcode::SubInt => "SUB_INT",
            Opcode::SubFloat => "SUB_FLOAT",
            Opcode::MulInt => "MUL_INT",
            Opcode::MulFloat => "MUL_FLOAT",
            Opcode::DivInt => "DIV_INT",
            Opcode::DivFloat => "DIV_FLOAT",
            Opcode::IntToFloat1 => "INT_TO_FLOAT_1",
            Opcode::FloatToInt1 => "FLOAT_TO_INT_1",
            Opcode::SquareRoot => "SQUARE_ROOT",
            Opcode::Return => "RETURN",
            Opcode::FetchLocalShort => "FETCH_LOCAL_SHORT",
            Opcode::FetchLocalLong => "FETCH_LOCAL_LONG",
            Opcode::FetchLocalFloat => "FETCH_LOCAL_FLOAT",
            Opcode::SkipZero => "SKIP_ZERO",
            Opcode::SkipNonZero => "SKIP_NON_ZERO",
            Opcode::EqualInt => "EQ_INT",
            Opcode::NotEqualInt => "NE_INT",
            Opcode::LessInt => "LT_INT",
            Opcode::LessOrEqualInt => "LE_INT",
            Opcode::GreaterInt => "GT_INT",
            Opcode::GreaterOrEqualInt => "GE_INT",
            Opcode::EqualFloat => "EQ_FLOAT",
            Opcode::NotEqualFloat => "NE_FLOAT",
            Opcode::LessFloat => "LT_FLOAT",
            Opcode::LessOrEqualFloat => "LE_FLOAT",
            Opcode::GreaterFloat => "GT_FLOAT",
            Opcode::GreaterOrEqualFloat => "GE_FLOAT",
            Opcode::MenuMode => "MENU_MODE",
            Opcode::StoreGlobalShort => "STORE_GLOBAL_SHORT",
            Opcode::StoreGlobalLong => "STORE_GLOBAL_LONG",
            Opcode::StoreGlobalFloat => "STORE_GLOBAL_FLOAT",
            Opcode::FetchGlobalShort => "FETCH_GLOBAL_SHORT",
            Opcode::FetchGlobalLong => "FETCH_GLOBAL_LONG",
            Opcode::FetchGlobalFloat => "FETCH_GLOBAL_FLOAT",
            Opcode::Random => "RANDOM",
            Opcode::ScriptRunning => "SCRIPT_RUNNING",
            Opcode::StartScript => "START_SCRIPT",
            Opcode::StopScript => "STOP_SCRIPT",
            Opcode::GetDistance => "GET_DISTANCE",
            Opcode::GetSecondsPassed => "GET_SECONDS_PASSED",
            Opcode::Enable => "ENABLE",
            Opcode::Disable => "DISABLE",
            Opcode::GetDisabled => "GET_DISABLED",
            Opcode::EnableExplicit => "ENABLE_EXPLICIT",
            Opcode::DisableExplicit => "DISABLE_EXPLICIT",
            Opcode::GetDisabledExplicit => "GET_DISABLED_EXPLICIT",
            Opcode::GetDistanceExplicit => "GET_DISTANCE_EXPLICIT",
            Opcode::Report => "REPORT",
            Opcode::StoreMemberShort => "STORE_MEMBER_SHORT",
            Opcode::StoreMemberLong => "STORE_MEMBER_LONG",
            Opcode::StoreMemberFloat => "STORE_MEMBER_FLOAT",
            Opcode::FetchMemberShort => "FETCH_MEMBER_SHORT",
            Opcode::FetchMemberLong => "FETCH_MEMBER_LONG",
            Opcode::FetchMemberFloat => "FETCH_MEMBER_FLOAT",
            Opcode::StoreGlobalMemberShort => "STORE_GLOBAL_MEMBER_SHORT",
            Opcode::StoreGlobalMemberLong => "STORE_GLOBAL_MEMBER_LONG",
            Opcode::StoreGlobalMemberFloat => "STORE_GLOBAL_MEMBER_FLOAT",
            Opcode::FetchGlobalMemberShort => "FETCH_GLOBAL_MEMBER_SHORT",
            Opcode::FetchGlobalMemberLong => "FETCH_GLOBAL_MEMBER_LONG",
            Opcode::FetchGlobalMemberFloat => "FETCH_GLOBAL_MEMBER_FLOAT",
            Opcode::StartScriptExplicit => "START_SCRIPT_EXPLICIT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_opcodes_count() {
        assert_eq!(ALL_OPCODES.len(), 76);
    }

    #[test]
    fn codes_are_unique_within_each_segment() {
        let mut seen = HashSet::new();
        for &op in &ALL_OPCODES {
            assert!(
                seen.insert((op.segment(), op.code())),
                "{op:?} reuses segment {} code {}",
                op.segment(),
                op.code()
            );
        }
    }

    #[test]
    fn codes_fit_their_segment() {
        for &op in &ALL_OPCODES {
            assert!(op.code() <= op.segment().max_opcode(), "{op:?}");
        }
    }

    #[test]
    fn segment5_is_dense_from_0_to_71() {
        let mut codes: Vec<u32> = ALL_OPCODES
            .iter()
            .filter(|op| op.segment() == Segment::Five)
            .map(|op| op.code())
            .collect();
        codes.sort_unstable();
        assert_eq!(codes, (0..=71).collect::<Vec<u32>>());
    }

    #[test]
    fn pinned_numbers() {
        // A handful of numbers compiled content depends on.
        assert_eq!(Opcode::DivInt.code(), 15);
        assert_eq!(Opcode::Return.code(), 20);
        assert_eq!(Opcode::Report.code(), 58);
        assert_eq!(Opcode::StoreMemberShort.code(), 59);
        assert_eq!(Opcode::FetchGlobalMemberFloat.code(), 70);
        assert_eq!(Opcode::MessageBox.segment(), Segment::Three);
        assert_eq!(Opcode::JumpBackward.segment(), Segment::Zero);
    }

    #[test]
    fn lookup_roundtrip() {
        for &op in &ALL_OPCODES {
            assert_eq!(Opcode::lookup(op.segment(), op.code()), Some(op));
        }
        assert_eq!(Opcode::lookup(Segment::Two, 0), None);
        assert_eq!(Opcode::lookup(Segment::Five, 72), None);
    }

    #[test]
    fn mnemonic_roundtrip() {
        for &op in &ALL_OPCODES {
            let m = op.mnemonic();
            assert_eq!(m, m.to_uppercase(), "mnemonic should be uppercase: {m}");
            assert_eq!(Opcode::from_mnemonic(m), Some(op));
        }
    }
}
