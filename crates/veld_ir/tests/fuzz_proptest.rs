use proptest::prelude::*;
use veld_ir::{Const, InlineMap, Instr, Operand, PatternLit, PatternOpts, SubstMap, Variable};

const NAMES: &[&str] = &["a", "b", "c", "d"];

fn var_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("a"), Just("b"), Just("c"), Just("d")]
}

fn const_operand() -> impl Strategy<Value = Operand> {
    prop_oneof![
        Just(Operand::Const(Const::Nil)),
        any::<bool>().prop_map(|b| Operand::Const(Const::Bool(b))),
        any::<i64>().prop_map(Operand::int),
        "[a-z]{0,6}".prop_map(|s| Operand::str(s)),
    ]
}

fn operand() -> impl Strategy<Value = Operand> {
    let leaf = prop_oneof![
        const_operand(),
        var_name().prop_map(|n| Operand::var(n)),
        Just(Operand::SelfRef),
    ];
    leaf.prop_recursive(3, 8, 1, |inner| {
        (inner, any::<bool>(), any::<bool>()).prop_map(|(src, once, ignore_case)| {
            Operand::Pattern(Box::new(PatternLit::new(
                src,
                PatternOpts {
                    once,
                    ignore_case,
                    ..PatternOpts::default()
                },
            )))
        })
    })
}

// Values are constants or variables, i.e. already-simplified forms; the
// keys may still chain or form cycles.
fn subst_map() -> impl Strategy<Value = SubstMap> {
    proptest::collection::vec(
        (
            var_name(),
            prop_oneof![const_operand(), var_name().prop_map(|n| Operand::var(n))],
        ),
        0..4,
    )
    .prop_map(|pairs| {
        let mut map = SubstMap::new();
        for (name, value) in pairs {
            map.bind(Variable::new(name), value);
        }
        map
    })
}

fn rename_map() -> InlineMap {
    InlineMap::from_pairs(
        NAMES
            .iter()
            .map(|n| (Variable::new(*n), Variable::new(format!("{n}_1")))),
    )
}

proptest! {
    #[test]
    fn operand_simplify_twice_equals_once(op in operand(), map in subst_map()) {
        let mut once = op;
        once.simplify(&map);
        let mut twice = once.clone();
        twice.simplify(&map);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn instr_simplify_twice_equals_once(src in operand(), map in subst_map()) {
        let mut instr = Instr::Copy { result: Variable::new("out"), src };
        instr.simplify_operands(&map);
        let after_once = instr.clone();
        instr.simplify_operands(&map);
        prop_assert_eq!(instr, after_once);
    }

    #[test]
    fn clone_for_inlining_never_mutates_the_original(op in operand()) {
        let before = op.clone();
        let _cloned = op.clone_for_inlining(&rename_map());
        prop_assert_eq!(op, before);
    }

    #[test]
    fn clone_variables_are_the_renamed_images(op in operand()) {
        let map = rename_map();
        let cloned = op.clone_for_inlining(&map);

        let mut original_vars = Vec::new();
        op.collect_variables(&mut original_vars);
        let mut cloned_vars = Vec::new();
        cloned.collect_variables(&mut cloned_vars);

        let expected: Vec<Variable> = original_vars.iter().map(|v| map.rename(v)).collect();
        prop_assert_eq!(cloned_vars, expected);
    }
}
