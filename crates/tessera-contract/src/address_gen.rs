//! Contract address derivation for CREATE and CREATE2

use rlp::RlpStream;
use tessera_crypto::{keccak256, keccak256_concat};
use tessera_primitives::{Address, H256};

/// Address of a contract deployed by `from` with `CREATE`:
/// `keccak256(rlp([from, nonce]))[12..]`
pub fn create(from: &Address, nonce: u64) -> Address {
    let mut stream = RlpStream::new_list(2);
    stream.append(from);
    stream.append(&nonce);
    last_20(&keccak256(&stream.out()))
}

/// Address of a contract deployed by `from` with `CREATE2`:
/// `keccak256(0xff ++ from ++ salt ++ keccak256(init_code))[12..]`
pub fn create2(from: &Address, salt: &H256, init_code: &[u8]) -> Address {
    let code_hash = keccak256(init_code);
    let hash = keccak256_concat(&[
        &[0xff],
        from.as_bytes(),
        salt.as_bytes(),
        code_hash.as_bytes(),
    ]);
    last_20(&hash)
}

fn last_20(hash: &H256) -> Address {
    let mut bytes = [0u8; Address::LEN];
    bytes.copy_from_slice(&hash.as_bytes()[H256::LEN - Address::LEN..]);
    Address::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::from_hex(s).unwrap()
    }

    #[test]
    fn test_create() {
        let sender = addr("0x6ac7ea33f8831ea9dcc53393aaa88b25a785dbf0");
        assert_eq!(
            create(&sender, 0),
            addr("0xcd234a471b72ba2f1ccf0a70fcaba648a5eecd8d")
        );
        assert_eq!(
            create(&sender, 1),
            addr("0x343c43a37d37dff08ae8c4a11544c718abb4fcf8")
        );
    }

    #[test]
    fn test_create_nonce_changes_address() {
        let sender = Address::from_bytes([0x11; 20]);
        assert_ne!(create(&sender, 0), create(&sender, 1));
        assert_ne!(create(&sender, 127), create(&sender, 128));
    }

    #[test]
    fn test_create2() {
        assert_eq!(
            create2(&Address::ZERO, &H256::ZERO, &[0x00]),
            addr("0x4D1A2e2bB4F88F0250f26Ffff098B0b30B26BF38")
        );

        let mut deployer = [0u8; 20];
        deployer[..4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(
            create2(&Address::from_bytes(deployer), &H256::ZERO, &[0x00]),
            addr("0xB928f69Bb1D91Cd65274e3c79d8986362984fDA3")
        );
    }
}
