//! Binding of the opcode manifest to instruction implementations.

use crate::context::VarType;
use crate::instructions::control::{JumpBackward, JumpForward, Return, SkipNonZero, SkipZero};
use crate::instructions::generic::{
    FetchFloatLiteral, FetchIntLiteral, FloatToInt, IntToFloat, NegateFloat, NegateInt, PushInt,
    SquareRoot,
};
use crate::instructions::math::{
    ArithOp, CompareOp, FloatArithmetic, FloatCompare, IntArithmetic, IntCompare,
};
use crate::instructions::misc::{
    Disable, Enable, GetDisabled, GetDistance, GetSecondsPassed, MenuMode, MessageBox, Random,
    Report, ScriptRunning, StartScript, StopScript, Target,
};
use crate::instructions::variables::{
    FetchGlobal, FetchLocal, FetchMember, StoreGlobal, StoreLocal, StoreMember,
};
use crate::opcodes::{Opcode0, OpcodeTable};
use mwscript_common::{Opcode, ALL_OPCODES};

/// Install every manifest opcode into `table`.
///
/// Panics if any manifest number is already taken.
pub fn install_opcodes(table: &mut OpcodeTable) {
    for opcode in ALL_OPCODES {
        install(table, opcode);
    }
}

fn install(table: &mut OpcodeTable, opcode: Opcode) {
    let code = opcode.code();
    let instruction: Box<dyn Opcode0> = match opcode {
        Opcode::PushInt => return table.install_segment0(code, Box::new(PushInt)),
        Opcode::JumpForward => return table.install_segment0(code, Box::new(JumpForward)),
        Opcode::JumpBackward => return table.install_segment0(code, Box::new(JumpBackward)),
        Opcode::MessageBox => return table.install_segment3(code, Box::new(MessageBox)),

        Opcode::StoreLocalShort => Box::new(StoreLocal(VarType::Short)),
        Opcode::StoreLocalLong => Box::new(StoreLocal(VarType::Long)),
        Opcode::StoreLocalFloat => Box::new(StoreLocal(VarType::Float)),
        Opcode::FetchLocalShort => Box::new(FetchLocal(VarType::Short)),
        Opcode::FetchLocalLong => Box::new(FetchLocal(VarType::Long)),
        Opcode::FetchLocalFloat => Box::new(FetchLocal(VarType::Float)),

        Opcode::IntToFloat => Box::new(IntToFloat(0)),
        Opcode::FloatToInt => Box::new(FloatToInt(0)),
        Opcode::IntToFloat1 => Box::new(IntToFloat(1)),
        Opcode::FloatToInt1 => Box::new(FloatToInt(1)),
        Opcode::FetchIntLiteral => Box::new(FetchIntLiteral),
        Opcode::FetchFloatLiteral => Box::new(FetchFloatLiteral),
        Opcode::NegateInt => Box::new(NegateInt),
        Opcode::NegateFloat => Box::new(NegateFloat),
        Opcode::SquareRoot => Box::new(SquareRoot),

        Opcode::AddInt => Box::new(IntArithmetic(ArithOp::Add)),
        Opcode::AddFloat => Box::new(FloatArithmetic(ArithOp::Add)),
        Opcode::SubInt => Box::new(IntArithmetic(ArithOp::Sub)),
        Opcode::SubFloat => Box::new(FloatArithmetic(ArithOp::Sub)),
        Opcode::MulInt => Box::new(IntArithmetic(ArithOp::Mul)),
        Opcode::MulFloat => Box::new(FloatArithmetic(ArithOp::Mul)),
        Opcode::DivInt => Box::new(IntArithmetic(ArithOp::Div)),
        Opcode::DivFloat => Box::new(FloatArithmetic(ArithOp::Div)),

        Opcode::Return => Box::new(Return),
        Opcode::SkipZero => Box::new(SkipZero),
        Opcode::SkipNonZero => Box::new(SkipNonZero),

        Opcode::EqualInt => Box::new(IntCompare(CompareOp::Equal)),
        Opcode::NotEqualInt => Box::new(IntCompare(CompareOp::NotEqual)),
        Opcode::LessInt => Box::new(IntCompare(CompareOp::Less)),
        Opcode::LessOrEqualInt => Box::new(IntCompare(CompareOp::LessOrEqual)),
        Opcode::GreaterInt => Box::new(IntCompare(CompareOp::Greater)),
        Opcode::GreaterOrEqualInt => Box::new(IntCompare(CompareOp::GreaterOrEqual)),
        Opcode::EqualFloat => Box::new(FloatCompare(CompareOp::Equal)),
        Opcode::NotEqualFloat => Box::new(FloatCompare(CompareOp::NotEqual)),
        Opcode::LessFloat => Box::new(FloatCompare(CompareOp::Less)),
        Opcode::LessOrEqualFloat => Box::new(FloatCompare(CompareOp::LessOrEqual)),
        Opcode::GreaterFloat => Box::new(FloatCompare(CompareOp::Greater)),
        Opcode::GreaterOrEqualFloat => Box::new(FloatCompare(CompareOp::GreaterOrEqual)),

        Opcode::StoreGlobalShort => Box::new(StoreGlobal(VarType::Short)),
        Opcode::StoreGlobalLong => Box::new(StoreGlobal(VarType::Long)),
        Opcode::StoreGlobalFloat => Box::new(StoreGlobal(VarType::Float)),
        Opcode::FetchGlobalShort => Box::new(FetchGlobal(VarType::Short)),
        Opcode::FetchGlobalLong => Box::new(FetchGlobal(VarType::Long)),
        Opcode::FetchGlobalFloat => Box::new(FetchGlobal(VarType::Float)),

        Opcode::StoreMemberShort => store_member(VarType::Short, false),
        Opcode::StoreMemberLong => store_member(VarType::Long, false),
        Opcode::StoreMemberFloat => store_member(VarType::Float, false),
        Opcode::FetchMemberShort => fetch_member(VarType::Short, false),
        Opcode::FetchMemberLong => fetch_member(VarType::Long, false),
        Opcode::FetchMemberFloat => fetch_member(VarType::Float, false),
        Opcode::StoreGlobalMemberShort => store_member(VarType::Short, true),
        Opcode::StoreGlobalMemberLong => store_member(VarType::Long, true),
        Opcode::StoreGlobalMemberFloat => store_member(VarType::Float, true),
        Opcode::FetchGlobalMemberShort => fetch_member(VarType::Short, true),
        Opcode::FetchGlobalMemberLong => fetch_member(VarType::Long, true),
        Opcode::FetchGlobalMemberFloat => fetch_member(VarType::Float, true),

        Opcode::MenuMode => Box::new(MenuMode),
        Opcode::Random => Box::new(Random),
        Opcode::GetSecondsPassed => Box::new(GetSecondsPassed),
        Opcode::Report => Box::new(Report),
        Opcode::Enable => Box::new(Enable(Target::Own)),
        Opcode::Disable => Box::new(Disable(Target::Own)),
        Opcode::GetDisabled => Box::new(GetDisabled(Target::Own)),
        Opcode::EnableExplicit => Box::new(Enable(Target::Explicit)),
        Opcode::DisableExplicit => Box::new(Disable(Target::Explicit)),
        Opcode::GetDisabledExplicit => Box::new(GetDisabled(Target::Explicit)),
        Opcode::ScriptRunning => Box::new(ScriptRunning),
        Opcode::StartScript => Box::new(StartScript(Target::Own)),
        Opcode::StartScriptExplicit => Box::new(StartScript(Target::Explicit)),
        Opcode::StopScript => Box::new(StopScript),
        Opcode::GetDistance => Box::new(GetDistance(Target::Own)),
        Opcode::GetDistanceExplicit => Box::new(GetDistance(Target::Explicit)),
    };
    table.install_segment5(code, instruction);
}

fn store_member(var_type: VarType, global: bool) -> Box<dyn Opcode0> {
    Box::new(StoreMember { var_type, global })
}

fn fetch_member(var_type: VarType, global: bool) -> Box<dyn Opcode0> {
    Box::new(FetchMember { var_type, global })
}
