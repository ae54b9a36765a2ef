mod common;

use common::{Entry, ZipBuilder, fields, reader};
use zip2hash::{Config, scan_archive};

fn scan(data: Vec<u8>, config: &Config) -> Option<String> {
    scan_archive(reader(data), "vault.zip", config).unwrap()
}

#[test]
fn test_single_entry_line() {
    let data = ZipBuilder::new()
        .entry(Entry::aes("doc.txt", 1, &[1, 2, 3, 4, 5]))
        .finish();
    let line = scan(data, &Config::default()).unwrap();

    assert!(line.starts_with("vault.zip:$zip2$*"));
    assert!(line.ends_with("*$/zip2$:::::vault.zip"));

    let start = line.find("$zip2$").unwrap();
    let end = line.find("$/zip2$").unwrap();
    assert_eq!(line[start..end].matches('*').count(), 9);

    let f = fields(&line, "$zip2$*", "*$/zip2$");
    assert_eq!(
        f,
        vec![
            "0",
            "1",
            "0",
            "5a5a5a5a5a5a5a5a",
            "abcd",
            "5",
            "0102030405",
            "eeeeeeeeeeeeeeeeeeee"
        ]
    );
}

#[test]
fn test_length_is_hex() {
    let ciphertext: Vec<u8> = (0..0x2f).collect();
    let data = ZipBuilder::new()
        .entry(Entry::aes("a.bin", 3, &ciphertext))
        .finish();
    let line = scan(data, &Config::default()).unwrap();
    let f = fields(&line, "$zip2$*", "*$/zip2$");

    assert_eq!(f[1], "3");
    assert_eq!(f[3].len(), 32);
    assert_eq!(f[5], "2f");
    assert_eq!(f[6], hex::encode(&ciphertext));
}

#[test]
fn test_smallest_entry_wins_in_any_order() {
    let entries = [
        Entry::aes("a", 2, &[0x30; 30]),
        Entry::aes("b", 2, &[0x05; 5]),
        Entry::aes("c", 2, &[0x12; 12]),
    ];
    let orders = [[0, 1, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

    for order in orders {
        let data = order
            .iter()
            .fold(ZipBuilder::new(), |b, &i| b.entry(entries[i].clone()))
            .finish();
        let line = scan(data, &Config::default()).unwrap();
        let f = fields(&line, "$zip2$*", "*$/zip2$");
        assert_eq!(f[5], "5", "order {:?}", order);
        assert_eq!(f[6], "0505050505");
    }
}

#[test]
fn test_inline_threshold_boundary() {
    let below = ZipBuilder::new()
        .entry(Entry::aes("a", 1, &[0x77; 63]))
        .finish();
    let line = scan(below, &Config::default()).unwrap();
    assert!(!line.contains("ZFILE"));
    assert!(line.contains(&"77".repeat(63)));

    let at = ZipBuilder::new()
        .entry(Entry::aes("a", 1, &[0x77; 64]))
        .finish();
    let line = scan(at, &Config::default()).unwrap();
    assert!(line.contains("ZFILE*"));
    assert!(!line.contains("7777"));
}

#[test]
fn test_external_reference_offsets() {
    let builder = ZipBuilder::new()
        .entry(Entry::plain("readme", b"hello"))
        .entry(Entry::aes("big.bin", 1, &[0x42; 100]));
    let header_offset = builder.offset(1);
    // header + name + AES extra field + salt + verifier
    let data_offset = header_offset + 30 + 7 + 11 + 8 + 2;
    let line = scan(builder.finish(), &Config::default()).unwrap();

    let f = fields(&line, "$zip2$*", "*$/zip2$");
    assert_eq!(f[5], "64");
    let expected = vec![
        "ZFILE".to_string(),
        "vault.zip".to_string(),
        format!("{:x}", header_offset),
        format!("{:x}", data_offset),
    ];
    assert_eq!(f[6..10], expected);
    assert_eq!(f[10], "eeeeeeeeeeeeeeeeeeee");
}

#[test]
fn test_custom_threshold() {
    let config = Config {
        inline_threshold: 4,
        ..Config::default()
    };
    let data = ZipBuilder::new()
        .entry(Entry::aes("a", 1, &[1, 2, 3, 4, 5]))
        .finish();
    assert!(scan(data, &config).unwrap().contains("ZFILE"));
}

#[test]
fn test_truncated_entry_is_fatal() {
    let mut data = ZipBuilder::new()
        .entry(Entry::aes("a", 1, &[9; 20]))
        .truncated();
    data.truncate(data.len() - 4);
    assert!(scan_archive(reader(data), "vault.zip", &Config::default()).is_err());
}

#[test]
fn test_bad_strength_is_fatal() {
    let mut entry = Entry::aes("a", 1, &[9; 20]);
    entry.extra[8] = 7;
    let data = ZipBuilder::new().entry(entry).finish();
    assert!(scan_archive(reader(data), "vault.zip", &Config::default()).is_err());
}
