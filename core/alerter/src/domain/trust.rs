//! 検索バックエンドの TLS 信頼方針

/// サーバ証明書をどう検証するか
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustMode {
    /// 標準のルート証明書で検証する
    Default,
    /// 検証しない
    Insecure,
    /// 指定 CA に固定する
    PinnedCa(PinnedCaPolicy),
}

/// CA 固定の判定
///
/// 相手が提示したチェーン（サーバ証明書、続いて相手が送ってきた証明書）が
/// ちょうど 2 要素で、2 番目の DER が固定 CA と一致するときだけ受け入れる。
/// 中間 CA を挟むチェーンや深さの違うチェーンは拒否する。
/// サーバ証明書が固定 CA の署名を持つかの検証は TLS アダプタが先に行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedCaPolicy {
    ca_der: Vec<u8>,
}

impl PinnedCaPolicy {
    pub fn new(ca_der: Vec<u8>) -> Self {
        Self { ca_der }
    }

    pub fn ca_der(&self) -> &[u8] {
        &self.ca_der
    }

    pub fn accepts(&self, chain: &[&[u8]]) -> bool {
        chain.len() == 2 && chain[1] == self.ca_der.as_slice()
    }
}
