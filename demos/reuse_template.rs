use scan_rust::{ScanOptions, Template};

fn main() {
    // Compile once, scan many subjects
    let template = Template::compile("塩ラーメン ￥%d円").unwrap();
    for subject in ["塩ラーメン ￥409円", "塩ラーメン ￥520円", "醤油ラーメン ￥480円"] {
        match template.scan(subject).get(0) {
            Some(price) => println!("{} -> {}", subject, price),
            None => println!("{} -> no match", subject),
        }
    }

    // A different marker keeps literal percent signs readable
    let options = ScanOptions::new().with_marker('$');
    let template = Template::with_options("cpu $d% mem $d%", &options).unwrap();
    let result = template.scan("cpu 93% mem 41%");
    println!("Values: {:?}", result.values());
}
