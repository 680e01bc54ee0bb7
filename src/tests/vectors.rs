//! Known-answer tests from FIPS-197 and NIST SP 800-38A.

use crate::{
    decrypt_block, decrypt_blocks, encrypt_block, encrypt_blocks, final_round,
    final_round_key_first, final_round_no_key, inv_final_round_key_first, inv_round_key_first,
    round, round_key_first, round_no_key, sub_bytes, xor_in_place, Block, Error, KeySchedule,
};

fn hex_to_bytes(hex: &str) -> Vec<u8> {
    hex::decode(
        hex.chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>(),
    )
    .unwrap()
}

fn hex_to_block(hex: &str) -> Block {
    let bytes = hex_to_bytes(hex);
    let mut block = [0u8; 16];
    block.copy_from_slice(&bytes);
    block
}

fn run_test_vector(test_name: &str, key_hex: &str, pt_hex: &str, expected_ct_hex: &str) {
    let key = hex_to_bytes(key_hex);
    let plaintext = hex_to_block(pt_hex);
    let expected = hex_to_block(expected_ct_hex);

    let schedule = KeySchedule::new(&key)
        .unwrap_or_else(|e| panic!("{test_name}: key expansion failed: {e}"));

    // Test encryption
    let mut block = plaintext;
    encrypt_block(&schedule, &mut block);
    assert_eq!(block, expected, "{test_name}: ciphertext mismatch");

    // Test decryption
    decrypt_block(&schedule.inverse(), &mut block);
    assert_eq!(block, plaintext, "{test_name}: decryption mismatch");
}

#[test]
fn test_fips197_appendix_b() {
    run_test_vector(
        "FIPS-197 B",
        "2b7e151628aed2a6abf7158809cf4f3c",
        "3243f6a8885a308d313198a2e0370734",
        "3925841d02dc09fbdc118597196a0b32",
    );
}

#[test]
fn test_fips197_appendix_c1_aes128() {
    run_test_vector(
        "FIPS-197 C.1",
        "000102030405060708090a0b0c0d0e0f",
        "00112233445566778899aabbccddeeff",
        "69c4e0d86a7b0430d8cdb78070b4c55a",
    );
}

#[test]
fn test_fips197_appendix_c2_aes192() {
    run_test_vector(
        "FIPS-197 C.2",
        "000102030405060708090a0b0c0d0e0f1011121314151617",
        "00112233445566778899aabbccddeeff",
        "dda97ca4864cdfe06eaf70a0ec0d7191",
    );
}

#[test]
fn test_fips197_appendix_c3_aes256() {
    run_test_vector(
        "FIPS-197 C.3",
        "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
        "00112233445566778899aabbccddeeff",
        "8ea2b7ca516745bfeafc49904b496089",
    );
}

#[test]
fn test_sp800_38a_ecb_aes192_and_aes256() {
    run_test_vector(
        "SP 800-38A F.1.3",
        "8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b",
        "6bc1bee22e409f96e93d7e117393172a",
        "bd334f1d6e45f25ff712a214571fa5cc",
    );
    run_test_vector(
        "SP 800-38A F.1.5",
        "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
        "6bc1bee22e409f96e93d7e117393172a",
        "f3eed1bdb5d2a03c064b5a7e3db181f8",
    );
}

#[test]
fn test_sp800_38a_ecb_aes128_bulk() {
    let schedule = KeySchedule::new(&hex_to_bytes("2b7e151628aed2a6abf7158809cf4f3c")).unwrap();
    let plaintext = [
        "6bc1bee22e409f96e93d7e117393172a",
        "ae2d8a571e03ac9c9eb76fac45af8e51",
        "30c81c46a35ce411e5fbc1191a0a52ef",
        "f69f2445df4f9b17ad2b417be66c3710",
    ];
    let ciphertext = [
        "3ad77bb40d7a3660a89ecaf32466ef97",
        "f5d3d58503b9699de785895a96fdbaaf",
        "43b1cd7f598ece23881b00e3ed030688",
        "7b0c785e27e8ad3f8223207104725dd4",
    ];

    // Four lanes plus a one-block tail
    let mut blocks: Vec<Block> = plaintext.iter().map(|h| hex_to_block(h)).collect();
    blocks.push(hex_to_block(plaintext[2]));
    encrypt_blocks(&schedule, &mut blocks);

    for (i, expected) in ciphertext.iter().enumerate() {
        assert_eq!(blocks[i], hex_to_block(expected), "block {i}");
    }
    assert_eq!(blocks[4], hex_to_block(ciphertext[2]), "tail block");

    decrypt_blocks(&schedule.inverse(), &mut blocks);
    assert_eq!(blocks[0], hex_to_block(plaintext[0]));
    assert_eq!(blocks[4], hex_to_block(plaintext[2]));
}

#[test]
fn test_sub_bytes_known_answer() {
    let mut state = hex_to_block("00102030405060708090a0b0c0d0e0f0");
    sub_bytes(&mut state);
    assert_eq!(state, hex_to_block("63cab7040953d051cd60e0e7ba70e18c"));
}

#[test]
fn test_invalid_key_length() {
    let key = hex_to_bytes("0102030405060708090a0b0c0d0e");
    assert_eq!(KeySchedule::new(&key).unwrap_err(), Error::InvalidKeyLength);
}

#[test]
fn test_aes128_from_single_rounds() {
    let schedule = KeySchedule::new(&hex_to_bytes("2b7e151628aed2a6abf7158809cf4f3c")).unwrap();
    let plaintext = hex_to_block("3243f6a8885a308d313198a2e0370734");
    let expected = hex_to_block("3925841d02dc09fbdc118597196a0b32");
    let rk = schedule.round_keys();

    // Standard order
    let mut state = plaintext;
    xor_in_place(&mut state, &rk[0]);
    for key in &rk[1..10] {
        round(&mut state, key);
    }
    final_round(&mut state, &rk[10]);
    assert_eq!(state, expected, "standard order");

    // Key-first order: the key of round i is applied at the start of round i + 1
    let mut state = plaintext;
    for key in &rk[..9] {
        round_key_first(&mut state, key);
    }
    final_round_key_first(&mut state, &rk[9]);
    xor_in_place(&mut state, &rk[10]);
    assert_eq!(state, expected, "key-first order");

    // Unkeyed rounds with explicit key additions
    let mut state = plaintext;
    xor_in_place(&mut state, &rk[0]);
    for key in &rk[1..10] {
        round_no_key(&mut state);
        xor_in_place(&mut state, key);
    }
    final_round_no_key(&mut state);
    xor_in_place(&mut state, &rk[10]);
    assert_eq!(state, expected, "unkeyed order");

    // Key-first decryption walks the forward schedule backwards
    xor_in_place(&mut state, &rk[10]);
    inv_final_round_key_first(&mut state, &rk[9]);
    for key in rk[..9].iter().rev() {
        inv_round_key_first(&mut state, key);
    }
    assert_eq!(state, plaintext, "key-first decryption");
}
