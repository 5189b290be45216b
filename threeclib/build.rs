fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    // Too slow to evaluate as a const, and only needs generating once
    let out_dir = std::env::var_os("OUT_DIR").unwrap();
    let path = std::path::Path::new(&out_dir).join("hex.rs");
    let table = format!("{:?}", hex_pair_table());
    std::fs::write(&path, format!("pub const HEX_LOOKUP: [[u8; 256]; 256] = {table};")).unwrap();
}

/// Maps every pair of ASCII bytes to the byte they spell in hex, non hex digits count as 0
fn hex_pair_table() -> Vec<[u8; 256]> {
    (0..=u8::MAX)
        .map(|high| {
            let mut row = [0u8; 256];
            for low in 0..=u8::MAX {
                row[low as usize] = hex_digit(high) << 4 | hex_digit(low);
            }
            row
        })
        .collect()
}

fn hex_digit(input: u8) -> u8 {
    match input {
        b'0'..=b'9' => input - b'0',
        b'A'..=b'F' => input - b'A' + 10,
        b'a'..=b'f' => input - b'a' + 10,
        _ => 0,
    }
}
