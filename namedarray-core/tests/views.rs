use std::{rc::Rc, sync::Arc};

use anyhow::Result;
use namedarray_core::{
    containers::{ArrayBuffer, FieldValue, NamedArray, Value},
    error::NamedArrayError,
    layout::{RegionSpec, ViewType},
    math::sin,
};
use rand::{thread_rng, Rng};

fn vec3() -> Arc<ViewType> {
    ViewType::compile("Vec3", 3, vec![("x", 0), ("y", 1), ("z", 2)]).unwrap()
}

fn twist(vec3: &Arc<ViewType>) -> Arc<ViewType> {
    ViewType::compile(
        "Twist",
        6,
        vec![("linear", vec3.region(0..3)), ("angular", vec3.region(3..6))],
    )
    .unwrap()
}

fn random_values(count: usize) -> Vec<f64> {
    let mut rng = thread_rng();
    (0..count).map(|_| rng.gen_range(-100.0..100.0)).collect()
}

#[test]
fn vec3_scenario() -> Result<()> {
    let v = NamedArray::from_slice(&vec3(), &[0.0, 1.0, 2.0])?;
    assert_eq!(0.0, v.scalar("x")?);
    assert_eq!(1.0, v.scalar("y")?);
    assert_eq!(2.0, v.scalar("z")?);

    v.set("x", 5.0)?;
    assert_eq!(5.0, v.scalar("x")?);
    assert_eq!(vec![5.0, 1.0, 2.0], v.data());
    Ok(())
}

#[test]
fn twist_scenario() -> Result<()> {
    let vec3 = vec3();
    let t = NamedArray::new(&twist(&vec3));

    let linear = t.nested("linear")?;
    assert_eq!("Vec3", linear.type_name());
    assert!(Arc::ptr_eq(&vec3, linear.view_type()));
    assert_eq!(0.0, linear.scalar("x")?);

    let again = t.nested("linear")?;
    assert!(Rc::ptr_eq(&linear, &again));
    Ok(())
}

#[test]
fn construct_round_trips_data() -> Result<()> {
    let vec3 = vec3();
    let schemas = vec![
        vec3.clone(),
        twist(&vec3),
        ViewType::builder("Mixed", [2, 4])
            .scalar("time", 0)
            .range("samples", 1..5)
            .typed("position", 5..8, &vec3)
            .build()?,
    ];
    for schema in schemas {
        for _ in 0..8 {
            let data = random_values(schema.len());
            let view = NamedArray::from_slice(&schema, &data)?;
            assert_eq!(data, view.data());
            assert_eq!(schema.shape(), view.buffer().shape());
        }
    }
    Ok(())
}

#[test]
fn scalar_set_then_get() -> Result<()> {
    let v = NamedArray::new(&vec3());
    for value in random_values(16) {
        for field in ["x", "y", "z"].iter() {
            v.set(field, value)?;
            assert_eq!(value, v.scalar(field)?);
        }
    }
    Ok(())
}

#[test]
fn writes_through_child_alias_parent_range() -> Result<()> {
    let vec3 = vec3();
    let twist = twist(&vec3);
    let child_data = random_values(3);

    let through_child = NamedArray::new(&twist);
    let angular = through_child.nested("angular")?;
    angular.set("x", child_data[0])?;
    angular.set("y", child_data[1])?;
    angular.set("z", child_data[2])?;

    let through_parent = NamedArray::new(&twist);
    through_parent.set("angular", child_data.clone())?;

    assert_eq!(through_parent.data(), through_child.data());
    assert_eq!(child_data, through_child.range("angular")?.to_vec());
    assert_eq!(vec![0.0; 3], through_child.range("linear")?.to_vec());
    Ok(())
}

#[test]
fn set_on_parent_is_visible_through_memoized_child() -> Result<()> {
    let t = NamedArray::new(&twist(&vec3()));
    let linear = t.nested("linear")?;
    t.set("linear", vec![7.0, 8.0, 9.0])?;
    assert!(Rc::ptr_eq(&linear, &t.nested("linear")?));
    assert_eq!(8.0, linear.scalar("y")?);
    Ok(())
}

#[test]
fn invalidation_creates_new_child() -> Result<()> {
    let mut t = NamedArray::new(&twist(&vec3()));
    let before = t.nested("linear")?;
    assert!(t.is_memoized("linear")?);
    t.invalidate("linear")?;
    assert!(!t.is_memoized("linear")?);

    let after = t.nested("linear")?;
    assert!(!Rc::ptr_eq(&before, &after));
    // The old child keeps aliasing the same memory
    before.set("z", 3.0)?;
    assert_eq!(3.0, after.scalar("z")?);
    Ok(())
}

#[test]
fn grandchildren_alias_the_root_buffer() -> Result<()> {
    let vec3 = vec3();
    let twist = twist(&vec3);
    let pair = ViewType::builder("TwistPair", 12)
        .typed("first", 0..6, &twist)
        .typed("second", 6..12, &twist)
        .build()?;
    let p = NamedArray::new(&pair);
    p.nested("second")?.nested("angular")?.set("z", 1.5)?;
    assert_eq!(1.5, p.data()[11]);

    p.set("second", vec![2.0; 6])?;
    assert_eq!(2.0, p.nested("second")?.nested("angular")?.scalar("z")?);
    Ok(())
}

#[test]
fn from_buffer_is_zero_copy() -> Result<()> {
    let buffer = ArrayBuffer::from_vec(vec![1.0, 2.0, 3.0]);
    let v = NamedArray::from_buffer(&vec3(), buffer.clone())?;
    v.set("y", 10.0)?;
    assert_eq!(vec![1.0, 10.0, 3.0], buffer.to_vec());
    assert!(v.buffer().shares_memory_with(&buffer));

    let copy = v.deep_copy();
    copy.set("y", 0.0)?;
    assert_eq!(10.0, v.scalar("y")?);
    Ok(())
}

#[test]
fn range_fields_alias() -> Result<()> {
    let signal = ViewType::builder("Signal", 5)
        .scalar("rate", 0)
        .range("samples", 1..5)
        .build()?;
    let s = NamedArray::new(&signal);
    match s.get("samples")? {
        FieldValue::Range(samples) => samples.set_at(2, 4.0),
        other => panic!("expected a range, got {:?}", other),
    }
    assert_eq!(vec![0.0, 0.0, 0.0, 4.0, 0.0], s.data());
    assert_eq!(Value::Sequence(vec![0.0, 0.0, 4.0, 0.0]), s.get("samples")?.to_value());
    Ok(())
}

#[test]
fn sin_of_view_equals_sin_of_buffer() -> Result<()> {
    let t = NamedArray::from_slice(&twist(&vec3()), &random_values(6))?;
    assert_eq!(sin(&t), sin(t.buffer()));
    let linear = t.nested("linear")?;
    assert_eq!(sin(&linear), sin(linear.buffer()));
    Ok(())
}

#[test]
fn error_scenarios() -> Result<()> {
    assert!(matches!(
        ViewType::compile("Bad", 3, vec![("x", 0), ("x", 1)]),
        Err(NamedArrayError::DuplicateField { field, .. }) if field == "x"
    ));
    assert!(matches!(
        ViewType::compile("Bad", 3, vec![("x", RegionSpec::Range(1..4))]),
        Err(NamedArrayError::OutOfBounds { .. })
    ));
    assert!(matches!(
        ViewType::builder("Bad", 4).typed("v", 0..4, &vec3()).build(),
        Err(NamedArrayError::ShapeMismatch { .. })
    ));

    let v = NamedArray::new(&vec3());
    assert!(matches!(
        v.get("nonexistent"),
        Err(NamedArrayError::UnknownField { field, .. }) if field == "nonexistent"
    ));
    assert!(matches!(
        NamedArray::from_slice(&vec3(), &[1.0, 2.0]),
        Err(NamedArrayError::Shape { .. })
    ));
    assert!(matches!(
        v.set("x", vec![1.0, 2.0]),
        Err(NamedArrayError::Shape { .. })
    ));
    assert!(matches!(
        v.nested("x"),
        Err(NamedArrayError::FieldKind { .. })
    ));
    assert_eq!(vec![0.0; 3], v.data());
    Ok(())
}
