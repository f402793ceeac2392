use std::sync::Arc;

use anyhow::Result;
use nalgebra::Vector3;
use namedarray_core::{
    containers::{build_from, populate_from, AttributeObject, NamedArray, Value},
    error::NamedArrayError,
    layout::ViewType,
};

#[derive(AttributeObject, Debug, Default, Clone, PartialEq)]
struct Point {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(AttributeObject, Debug, Default, Clone, PartialEq)]
struct Twist {
    #[namedarray(nested)]
    linear: Point,
    angular: Vector3<f64>,
    time: f32,
    #[namedarray(skip)]
    label: String,
}

#[derive(AttributeObject, Debug, Default, PartialEq)]
struct Pose {
    orientation: [f64; 4],
    frame: u32,
}

fn vec3() -> Arc<ViewType> {
    ViewType::compile("Vec3", 3, vec![("x", 0), ("y", 1), ("z", 2)]).unwrap()
}

fn twist_type() -> Arc<ViewType> {
    let vec3 = vec3();
    ViewType::builder("Twist", 7)
        .typed("linear", 0..3, &vec3)
        .typed("angular", 3..6, &vec3)
        .scalar("time", 6)
        .build()
        .unwrap()
}

#[test]
fn derived_attributes() -> Result<()> {
    let mut point = Point {
        x: 1.0,
        y: 2.0,
        z: 3.0,
    };
    assert!(point.has_attribute("y"));
    assert!(!point.has_attribute("w"));
    assert_eq!(Some(Value::Scalar(2.0)), point.get_attribute("y"));

    point.set_attribute("z", Value::Scalar(-1.0))?;
    assert_eq!(-1.0, point.z);
    assert_eq!(
        Err(NamedArrayError::MissingAttribute {
            attribute: "w".into()
        }),
        point.set_attribute("w", Value::Scalar(0.0))
    );
    assert!(matches!(
        point.set_attribute("x", Value::Sequence(vec![1.0])),
        Err(NamedArrayError::AttributeType { .. })
    ));
    Ok(())
}

#[test]
fn skipped_and_nested_members() {
    let twist = Twist::default();
    assert!(!twist.has_attribute("label"));
    assert!(twist.has_attribute("linear"));
    assert_eq!(None, twist.get_attribute("linear"));
    assert!(twist.attribute_object("linear").is_some());
    assert!(twist.attribute_object("angular").is_none());
}

#[test]
fn struct_to_view_and_back() -> Result<()> {
    let twist = Twist {
        linear: Point {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        },
        angular: Vector3::new(4.0, 5.0, 6.0),
        time: 0.5,
        label: "first".into(),
    };
    let view = build_from(&twist_type(), &twist, None)?;
    assert_eq!(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 0.5], view.data());
    assert_eq!(2.0, view.nested("linear")?.scalar("y")?);

    view.nested("linear")?.set("x", 10.0)?;
    view.set("time", 1.5)?;

    let mut copy = Twist {
        label: "second".into(),
        ..Default::default()
    };
    populate_from(&view, &mut copy, None)?;
    assert_eq!(10.0, copy.linear.x);
    assert_eq!(Vector3::new(4.0, 5.0, 6.0), copy.angular);
    assert_eq!(1.5, copy.time);
    assert_eq!("second", copy.label);
    Ok(())
}

#[test]
fn struct_with_arrays() -> Result<()> {
    let pose_type = ViewType::builder("Pose", 5)
        .range("orientation", 0..4)
        .scalar("frame", 4)
        .build()?;
    let pose = Pose {
        orientation: [0.0, 0.0, 0.0, 1.0],
        frame: 7,
    };
    let view = NamedArray::from_object(&pose_type, &pose, None)?;
    assert_eq!(vec![0.0, 0.0, 0.0, 1.0, 7.0], view.data());

    let mut back = Pose::default();
    view.fill_object(&mut back, None)?;
    assert_eq!(pose, back);

    let short = ViewType::builder("Short", 3)
        .range("orientation", 0..3)
        .build()?;
    let view = NamedArray::new(&short);
    assert!(matches!(
        view.fill_object(&mut back, None),
        Err(NamedArrayError::AttributeType { .. })
    ));
    Ok(())
}
