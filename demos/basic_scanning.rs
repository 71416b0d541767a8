use scan_rust::{scan, slots};

fn main() {
    // A single string
    let mut world = String::new();
    scan("Hello %s", "Hello World").bind_one(0, &mut world).unwrap();
    println!("Scanned string: {}", world); // Output: Scanned string: World

    // Strings and integers together
    let mut name = String::new();
    let mut number = 0i64;
    scan("Hello %s, my number is %d", "Hello iorin, my number is 9753")
        .bind_all(&mut slots![&mut name, &mut number])
        .unwrap();
    println!("Name: {}, Number: {}", name, number); // Output: Name: iorin, Number: 9753

    // Octal and binary integers
    let mut octal = 0i32;
    let mut binary = 0i32;
    scan("mode %o, mask %b", "mode 755, mask 1010")
        .bind_all(&mut slots![&mut octal, &mut binary])
        .unwrap();
    println!("Mode: {}, Mask: {}", octal, binary); // Output: Mode: 493, Mask: 10

    // Booleans and floats
    let mut ok = false;
    let mut ratio = 0f64;
    scan("ok=%t ratio=%f", "ok=true ratio=0.75")
        .bind_all(&mut slots![&mut ok, &mut ratio])
        .unwrap();
    println!("Ok: {}, Ratio: {}", ok, ratio); // Output: Ok: true, Ratio: 0.75

    // Failures carry the offending text
    let mut room = 0i64;
    if let Err(err) = scan("Room %d", "Room One").bind_one(0, &mut room) {
        println!("Scan failed: {}", err);
    }
}
