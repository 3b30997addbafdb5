use hex_literal::hex;
use pretty_assertions::assert_eq;
use segsign::messages::{OutPoint, SpendingMode, Tx, TxIn, TxOut};
use segsign::network::Network;
use segsign::script::Chunk;
use segsign::transaction::sighash::{sighash, SIGHASH_ALL};
use segsign::transaction::{p2pkh, sign_transaction, verify_input, verify_signature};
use segsign::util::{Error, Hash256, Result};
use segsign::wallet::Key;

const GENESIS_ADDRESS: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";

const LEGACY_SIGNED: &str = concat!(
    "0100000001000000000000000000000000000000000000000000000000000000000000000100000000",
    "6a47304402205fb4dbec6b51381472e25c7cadf4b70b41f766e5f4b98734fd78a457a3ebf961022",
    "04b4b0e01d25c05a9ebbfab6da31d13f8bdd8512cba3785b373d5d42765eec7e001210339a36013",
    "301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2ffffffff01905f0100000000",
    "001976a91462e907b15cbf27d5425399ebf6f0fb50ebb88f1888ac00000000"
);

const WRAPPED_SIGNED: &str = concat!(
    "02000000000101000000000000000000000000000000000000000000000000000000000000000100",
    "000000171600143442193e1bb70916e914552172cd4e2dbc9df811ffffffff01905f010000000000",
    "1976a914243f1394f44554f4ce3fd68649c19adc483ce92488ac02473044022023ee6d6dcb7f03d7",
    "bfb3ac4ba8f5df07b5f7159579df63c92257da61224467ff022059660628f9809057fe072f46b249",
    "68414f608fab5f2550b77f50095ba593798401210339a36013301597daef41fbe593a02cc513d0b5",
    "5527ec2df1050e2e8ff49c85c200000000"
);

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn test_key() -> Result<Key> {
    Key::from_private_key(&hex!(
        "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
    ))
}

fn prev_output() -> OutPoint {
    let mut hash = [0u8; 32];
    hash[31] = 1;
    OutPoint {
        hash: Hash256(hash),
        index: 0,
    }
}

#[test]
fn legacy_spend() -> Result<()> {
    init_logger();
    let key = test_key()?;
    let from = key.address(Network::Mainnet, SpendingMode::Legacy);

    let mut tx = Tx::new(1, 0);
    tx.add_input(TxIn::from_address(Network::Mainnet, &from, prev_output(), 100_000)?);
    tx.add_output(TxOut::to_address(Network::Mainnet, GENESIS_ADDRESS, 90_000)?);
    assert_eq!(tx.inputs[0].mode, SpendingMode::Legacy);
    assert_eq!(tx.inputs[0].sequence, 0xffffffff);

    let signed = tx.sign(&[key.clone()], SIGHASH_ALL)?;
    let hex = signed.to_hex();
    assert_eq!(hex, LEGACY_SIGNED);
    let mut prefix = String::from("0100000001");
    prefix.push_str(&"00".repeat(31));
    prefix.push_str("0100000000");
    assert!(hex.starts_with(&prefix), "{}", hex);
    assert!(hex.ends_with(
        "ffffffff01905f0100000000001976a91462e907b15cbf27d5425399ebf6f0fb50ebb88f1888ac00000000"
    ));
    assert!(!signed.is_witness());
    assert_eq!(Tx::from_hex(&hex)?, {
        let mut decoded = signed.clone();
        decoded.inputs[0].satoshis = 0;
        decoded
    });

    // Pull the signature back out and check it against a recomputed sighash
    let chunks = signed.inputs[0].unlock_script.chunks()?;
    let (sig, pubkey) = match chunks.as_slice() {
        [Chunk::Push(_, sig), Chunk::Push(_, pubkey)] => (*sig, *pubkey),
        _ => panic!("Unexpected unlock script {:?}", signed.inputs[0].unlock_script),
    };
    assert_eq!(pubkey, &key.public_key[..]);
    let (flag, der) = sig.split_last().unwrap();
    assert_eq!(*flag, 0x01);
    let hash = sighash(&tx, &tx.inputs[0], 0, SIGHASH_ALL);
    assert!(verify_signature(der, &hash, pubkey)?);

    let lock_script = p2pkh::create_lock_script(&key.pubkey_hash());
    verify_input(&signed, 0, &lock_script)?;
    Ok(())
}

#[test]
fn wrapped_witness_spend() -> Result<()> {
    init_logger();
    let key = test_key()?;
    let from = key.address(Network::Testnet, SpendingMode::WrappedWitness);
    assert!(from.starts_with('2'));

    let mut tx = Tx::new(2, 0);
    let input = TxIn::from_address(Network::Testnet, &from, prev_output(), 100_000)?;
    let lock_script = input.unlock_script.clone();
    tx.add_input(input);
    tx.add_output(TxOut::to_address(Network::Testnet, "mipcBbFg9gMiCh81Kj8tqqdgoZub1ZJRfn", 90_000)?);
    assert_eq!(tx.inputs[0].mode, SpendingMode::WrappedWitness);

    let signed = tx.sign(&[key.clone()], SIGHASH_ALL)?;
    assert_eq!(signed.to_hex(), WRAPPED_SIGNED);
    assert_eq!(signed.id(), "299994ed7bf1757f58df7a0db61776eeead1403d73ff9a2b0754a561024c19ae");
    let bytes = hex::decode(signed.to_hex())?;
    assert_eq!(bytes[4..6].to_vec(), vec![0, 1]);
    assert_eq!(bytes.len(), signed.size());

    // Witness section sits right before the lock time
    let witness = &signed.inputs[0].witness;
    let mut expected_witness = vec![2, witness[0].len() as u8];
    expected_witness.extend_from_slice(&witness[0]);
    expected_witness.push(33);
    expected_witness.extend_from_slice(&key.public_key);
    let end = bytes.len() - 4;
    assert_eq!(bytes[end - expected_witness.len()..end].to_vec(), expected_witness);
    assert_eq!(bytes[end..].to_vec(), vec![0, 0, 0, 0]);

    // Unlock script is the redeem script push and stays out of the witness
    let mut redeem_push = vec![22, 0, 20];
    redeem_push.extend_from_slice(&key.pubkey_hash().0);
    assert_eq!(signed.inputs[0].unlock_script.0, redeem_push);

    // The id hashes the layout without witness data
    let mut stripped = signed.clone();
    stripped.inputs[0].witness.clear();
    assert_eq!(signed.id(), stripped.id());
    assert_ne!(signed.to_hex(), stripped.to_hex());

    let decoded = Tx::from_hex(&signed.to_hex())?;
    assert_eq!(decoded.inputs[0].mode, SpendingMode::WrappedWitness);
    assert_eq!(decoded.inputs[0].witness, signed.inputs[0].witness);

    verify_input(&signed, 0, &lock_script)?;
    Ok(())
}

#[test]
fn mixed_inputs() -> Result<()> {
    init_logger();
    let legacy_key = test_key()?;
    let witness_key = Key::from_private_key(&[0x42; 32])?;
    let legacy_from = legacy_key.address(Network::Mainnet, SpendingMode::Legacy);
    let witness_from = witness_key.address(Network::Mainnet, SpendingMode::WrappedWitness);

    let mut tx = Tx::new(2, 0);
    let second = OutPoint {
        hash: Hash256([5; 32]),
        index: 3,
    };
    tx.add_input(TxIn::from_address(Network::Mainnet, &legacy_from, prev_output(), 30_000)?);
    tx.add_input(TxIn::from_address(Network::Mainnet, &witness_from, second, 70_000)?);
    tx.add_output(TxOut::to_address(Network::Mainnet, GENESIS_ADDRESS, 95_000)?);
    tx.add_output(TxOut::op_return(b"segsign")?);
    let locks: Vec<_> = tx.inputs.iter().map(|i| i.unlock_script.clone()).collect();

    let signed = sign_transaction(&tx, &[legacy_key, witness_key], SIGHASH_ALL)?;
    assert!(signed.is_witness());
    // Legacy input keeps an empty witness entry
    assert!(signed.inputs[0].witness.is_empty());
    assert_eq!(signed.inputs[1].witness.len(), 2);
    for (i, lock_script) in locks.iter().enumerate() {
        verify_input(&signed, i, lock_script)?;
    }
    Ok(())
}

#[test]
fn batch_signing_is_all_or_nothing() -> Result<()> {
    init_logger();
    let key = test_key()?;
    let from = key.address(Network::Mainnet, SpendingMode::Legacy);
    let mut tx = Tx::new(1, 0);
    tx.add_input(TxIn::from_address(Network::Mainnet, &from, prev_output(), 1_000)?);
    tx.add_input(TxIn::from_address(Network::Mainnet, &from, prev_output(), 2_000)?);
    tx.add_output(TxOut::to_address(Network::Mainnet, GENESIS_ADDRESS, 2_500)?);
    let before = tx.clone();

    // Missing key for the second input
    let err = tx.sign(&[key.clone()], SIGHASH_ALL).unwrap_err();
    assert!(matches!(err, Error::SigningError(_)));
    assert_eq!(tx, before);

    // Second key is unusable, first input would have signed
    let broken = Key {
        private_key: [0; 32],
        public_key: key.public_key,
    };
    let err = tx.sign(&[key.clone(), broken], SIGHASH_ALL).unwrap_err();
    assert!(matches!(err, Error::SigningError(_)));
    assert_eq!(tx, before);

    let signed = tx.sign(&[key.clone(), key], SIGHASH_ALL)?;
    assert_ne!(signed, before);
    assert_eq!(tx, before);
    Ok(())
}
