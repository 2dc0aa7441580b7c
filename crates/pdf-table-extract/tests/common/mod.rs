#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, StringFormat, Stream, dictionary, encryption};

/// One Courier text block per page, one `Tj` per line.
pub fn build_pdf(pages: &[Vec<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids = Vec::new();
    for lines in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("TL", vec![16.into()]),
            Operation::new("Td", vec![50.into(), 780.into()]),
        ];
        for (index, line) in lines.iter().enumerate() {
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            if index + 1 < lines.len() {
                operations.push(Operation::new("T*", vec![]));
            }
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let encoded = content.encode().expect("content stream should encode");
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        }));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<Object>>(),
            "Count" => i64::try_from(page_ids.len()).expect("page count fits"),
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("fixture PDF should serialize");
    bytes
}

pub fn create_test_pdf(path: &Path, pages: &[Vec<&str>]) {
    std::fs::write(path, build_pdf(pages)).expect("fixture PDF should be written");
}

const PASSWORD_PAD: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut state = (0..=255_u8).collect::<Vec<_>>();
    let mut j = 0_u8;
    for i in 0..256 {
        j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
        state.swap(i, usize::from(j));
    }

    let (mut i, mut j) = (0_u8, 0_u8);
    data.iter()
        .map(|byte| {
            i = i.wrapping_add(1);
            j = j.wrapping_add(state[usize::from(i)]);
            state.swap(usize::from(i), usize::from(j));
            let index = state[usize::from(i)].wrapping_add(state[usize::from(j)]);
            byte ^ state[usize::from(index)]
        })
        .collect()
}

/// Adds a standard security handler (RC4, revision 2, 40-bit key) with the
/// given `U` entry and returns the id of its dictionary.
fn attach_security_handler(doc: &mut Document, user_hash: Vec<u8>) -> ObjectId {
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
        "P" => -44,
        "O" => Object::String(vec![0x5A; 32], StringFormat::Hexadecimal),
        "U" => Object::String(user_hash, StringFormat::Hexadecimal),
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set(
        "ID",
        vec![
            Object::String(vec![0x11; 16], StringFormat::Hexadecimal),
            Object::String(vec![0x11; 16], StringFormat::Hexadecimal),
        ],
    );
    encrypt_id
}

fn serialize(doc: &mut Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("protected fixture should serialize");
    bytes
}

/// Protected with a user hash that matches no password, so every passphrase is rejected.
pub fn protect(pdf: &[u8]) -> Vec<u8> {
    let mut doc = Document::load_mem(pdf).expect("fixture PDF should load");
    attach_security_handler(&mut doc, vec![0xA5; 32]);
    serialize(&mut doc)
}

/// Protected with `password` as the user password; every stream is RC4-encrypted.
pub fn protect_with(pdf: &[u8], password: &str) -> Vec<u8> {
    let mut doc = Document::load_mem(pdf).expect("fixture PDF should load");
    let encrypt_id = attach_security_handler(&mut doc, Vec::new());

    let key = encryption::get_encryption_key(&doc, password, false)
        .expect("encryption key should derive");
    doc.get_object_mut(encrypt_id)
        .and_then(Object::as_dict_mut)
        .expect("encryption dictionary exists")
        .set(
            "U",
            Object::String(rc4(&key, &PASSWORD_PAD), StringFormat::Hexadecimal),
        );

    let ids = doc
        .objects
        .keys()
        .copied()
        .filter(|id| *id != encrypt_id)
        .collect::<Vec<_>>();
    for id in ids {
        let object = doc.objects.get_mut(&id).expect("object id was just listed");
        // RC4 is symmetric: decrypting plaintext encrypts it.
        let Ok(encrypted) = encryption::decrypt_object(&key, id, object) else {
            continue;
        };
        match object {
            Object::Stream(stream) => stream.set_content(encrypted),
            Object::String(content, _) => *content = encrypted,
            _ => {}
        }
    }

    serialize(&mut doc)
}
