//! Basic usage example for the AES round primitives.

use aes_rounds::{
    backend_name, decrypt_block, encrypt_block, encrypt_blocks, inv_round_key_first, round,
    round_key_first, round_lanes, rounds_with_final, soft, Block4, Error, Key4, KeySchedule,
    RoundKeys10,
};

fn main() -> Result<(), Error> {
    println!("AES Round Primitives Example");
    println!("============================");
    println!("Backend: {}", backend_name());

    // Example 1: Whole-block encryption and decryption
    block_example()?;

    // Example 2: Building AES-128 from individual rounds
    rounds_example()?;

    // Example 3: Multi-lane processing
    lanes_example();

    // Example 4: Error handling
    error_handling_example();

    Ok(())
}

fn block_example() -> Result<(), Error> {
    println!("\n1. Block Encryption/Decryption:");

    // FIPS-197 Appendix C.1
    let key: Vec<u8> = (0x00..=0x0f).collect();
    let schedule = KeySchedule::new(&key)?;
    let mut block: [u8; 16] = core::array::from_fn(|i| (i as u8) * 0x11);
    let plaintext = block;

    encrypt_block(&schedule, &mut block);
    println!("  Plaintext:  {:02x?}", &plaintext[..8]);
    println!("  Ciphertext: {:02x?}", &block[..8]);
    assert_eq!(block[..4], [0x69, 0xc4, 0xe0, 0xd8]);

    decrypt_block(&schedule.inverse(), &mut block);
    assert_eq!(block, plaintext);
    println!("  ✓ Encryption/decryption successful!");

    let mut many = vec![plaintext; 10];
    encrypt_blocks(&schedule, &mut many);
    println!("  Encrypted {} blocks in bulk", many.len());

    Ok(())
}

fn rounds_example() -> Result<(), Error> {
    println!("\n2. AES-128 From Rounds:");

    let schedule = KeySchedule::new(&[0x2b; 16])?;
    let plaintext = *b"round primitives";

    let mut expected = plaintext;
    encrypt_block(&schedule, &mut expected);

    // Whitening, nine full rounds, one final round
    let mut state = plaintext;
    soft::add_round_key(&mut state, schedule.round_key(0));
    for i in 1..10 {
        round(&mut state, schedule.round_key(i));
    }
    aes_rounds::final_round(&mut state, schedule.round_key(10));
    assert_eq!(state, expected);
    println!("  ✓ Single rounds match encrypt_block");

    // The same thing with one batched call
    let keys: RoundKeys10 = schedule.round_key_array(1);
    let mut state = plaintext;
    soft::add_round_key(&mut state, schedule.round_key(0));
    rounds_with_final(&mut state, &keys);
    assert_eq!(state, expected);
    println!("  ✓ Batched rounds match encrypt_block");

    // Key-first rounds invert exactly
    let mut state = plaintext;
    round_key_first(&mut state, schedule.round_key(3));
    inv_round_key_first(&mut state, schedule.round_key(3));
    assert_eq!(state, plaintext);
    println!("  ✓ Key-first round inverted");

    Ok(())
}

fn lanes_example() {
    println!("\n3. Multi-lane Rounds:");

    let mut blocks = Block4::new([[0x00; 16], [0x11; 16], [0x22; 16], [0x33; 16]]);
    let keys = Key4::new([[0xa0; 16], [0xb1; 16], [0xc2; 16], [0xd3; 16]]);
    let original = blocks;

    round_lanes(&mut blocks, &keys);
    for i in 0..4 {
        let mut single = original[i];
        round(&mut single, &keys[i]);
        assert_eq!(blocks[i], single);
    }
    println!("  Lanes: {}, bytes: {}", Block4::LANES, Block4::BYTES);
    println!("  ✓ Every lane matches the single-block round");
}

fn error_handling_example() {
    println!("\n4. Error Handling:");

    for len in [0usize, 15, 20, 33] {
        match KeySchedule::new(&vec![0u8; len]) {
            Ok(_) => println!("  ✗ {len}-byte key should have failed!"),
            Err(Error::InvalidKeyLength) => {
                println!("  ✓ {len}-byte key rejected");
            }
        }
    }
}
