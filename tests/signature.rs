use vnpay_gateway::signature::{select_algorithm, signatures_match, AlgorithmSource, HashAlgorithm};

const SECRET: &str = "PHM5SXSA6J9U9ZCMAJPITW1Q9SW745OM";
const SIGNING_DATA: &str = "vnp_Amount=11000000&vnp_Command=pay&vnp_CreateDate=20251111223017&vnp_CurrCode=VND&vnp_IpAddr=127.0.0.1&vnp_Locale=vn&vnp_OrderInfo=Thanh toan don hang - LT-06 - HD 2 - Ban LT-06&vnp_OrderType=other&vnp_ReturnUrl=http://localhost:8080/.../return&vnp_TmnCode=KGAZB8XO&vnp_TxnRef=13bf7a78f35a46fe8650e30682537025&vnp_Version=2.1.0";

#[test]
fn hmac_sha512_known_answer() {
    let digest = HashAlgorithm::HmacSha512.digest(SECRET, SIGNING_DATA);
    assert_eq!(
        digest,
        "57ce7d66e3ae57b9612bfa64020949a7aee68c044702cc34547b9c13f9ba0224e87e93b3265d259108af3d85c17417f4861529204740b4d746324747b8359c71"
    );
}

#[test]
fn keyed_prefix_sha256_known_answer() {
    let digest = HashAlgorithm::Sha256.digest(SECRET, SIGNING_DATA);
    assert_eq!(digest, "eb5027cf1eb1184a39b19a861323b27d4e830d44bb65047bbcdd8487ffc085e5");
}

#[test]
fn hmac_sha256_known_answer() {
    let digest = HashAlgorithm::HmacSha256.digest(SECRET, SIGNING_DATA);
    assert_eq!(digest, "6a078c10645ce620e35bedc0bc387f21670955910777721397b3e5371a9e0457");
}

#[test]
fn digests_are_lowercase_hex_of_expected_length() {
    for algorithm in [HashAlgorithm::HmacSha512, HashAlgorithm::Sha256, HashAlgorithm::HmacSha256] {
        let digest = algorithm.digest("k", "");
        assert_eq!(digest.len(), algorithm.hex_len(), "{}", algorithm);
        assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}

#[test]
fn hmac_accepts_keys_of_any_length() {
    let long_key = "k".repeat(4096);
    for key in ["x", long_key.as_str()] {
        assert_eq!(HashAlgorithm::HmacSha512.digest(key, "data").len(), 128);
        assert_eq!(HashAlgorithm::HmacSha256.digest(key, "data").len(), 64);
    }
}

#[test]
fn selects_by_digest_length() {
    let sel = select_algorithm(None, &"a".repeat(128));
    assert_eq!(sel.algorithm, HashAlgorithm::HmacSha512);
    assert_eq!(sel.source, AlgorithmSource::DigestLength);

    let sel = select_algorithm(None, &"a".repeat(64));
    assert_eq!(sel.algorithm, HashAlgorithm::HmacSha256);
    assert_eq!(sel.source, AlgorithmSource::DigestLength);
}

#[test]
fn hint_overrides_length() {
    let sel = select_algorithm(Some("SHA256"), &"a".repeat(64));
    assert_eq!(sel.algorithm, HashAlgorithm::Sha256);
    assert_eq!(sel.source, AlgorithmSource::Hint);

    let sel = select_algorithm(Some("hmac-sha512"), &"a".repeat(64));
    assert_eq!(sel.algorithm, HashAlgorithm::HmacSha512);
}

#[test]
fn unknown_length_or_hint_falls_back() {
    let sel = select_algorithm(None, "abc");
    assert_eq!(sel.algorithm, HashAlgorithm::HmacSha512);
    assert_eq!(sel.source, AlgorithmSource::Default);

    let sel = select_algorithm(Some("MD5"), &"a".repeat(64));
    assert_eq!(sel.algorithm, HashAlgorithm::HmacSha256);
    assert_eq!(sel.source, AlgorithmSource::DigestLength);
}

#[test]
fn hint_names_parse_back() {
    for algorithm in [HashAlgorithm::HmacSha512, HashAlgorithm::Sha256, HashAlgorithm::HmacSha256] {
        assert_eq!(algorithm.hint_name().parse::<HashAlgorithm>().unwrap(), algorithm);
    }
    assert!("sha1".parse::<HashAlgorithm>().is_err());
}

#[test]
fn comparison_ignores_case_but_not_content() {
    assert!(signatures_match("abcdef", "ABCDEF"));
    assert!(!signatures_match("abcdef", "abcdee"));
    assert!(!signatures_match("abcdef", "abcde"));
    assert!(!signatures_match("abcdef", ""));
}
