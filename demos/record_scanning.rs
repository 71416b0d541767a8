use scan_rust::{record, scan, Slot, Value};

#[derive(Debug, Default)]
struct Sample {
    text: String,
    number: i64,
    flag: bool,
    ratio: f64,
}

record!(Sample { text, number, flag, ratio });

fn main() {
    // A braced %v capture is split into fields and bound member by member
    let mut sample = Sample::default();
    scan("sample %v", "sample {Hello 123 true 123.456}")
        .bind_one(0, Slot::Record(&mut sample))
        .unwrap();
    println!("Record: {:?}", sample);

    // Without braces %v detects the kind of the whole capture
    for subject in ["value 42", "value false", "value 2.5", "value Hello"] {
        let result = scan("value %v", subject);
        if let Some(value) = result.get(0) {
            println!("{:>12} -> {} ({})", subject, value, value.kind());
        }
    }

    // Inspect the fields without binding
    let result = scan("point %v", "point {3 4}");
    if let Some(Value::Record(fields)) = result.get(0) {
        println!("Fields: {:?}", fields);
    }
}
