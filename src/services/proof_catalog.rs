//! 证明目录 - 业务能力层
//!
//! 已知证明请求到求值器表达式的静态映射，键为小写、去首尾空白后的请求文本

use phf::phf_map;

/// 未收录的证明请求使用的表达式
pub const UNKNOWN_PROOF: &str = "False";

static PROOFS: phf::Map<&'static str, &'static str> = phf_map! {
    "that the empty set is a subset of all sets" =>
        "ForAll[{A}, Implies[Element[x, {}], Element[x, A]]]",
    "the irrationality of √2" => "Element[Surd[2, 2], Reals]",
    "bernoulli's inequality" => "BernoulliInequality[n, x]",
    "the limit of 3x as x approaches 2 is 6" => "Limit[3*x, x->2]",
    "area of an annulus" => "Integrate[2*Pi*rho, {rho, r, R}]",
};

/// 查找证明请求对应的表达式
pub fn lookup(request: &str) -> Option<&'static str> {
    PROOFS.get(request.trim().to_lowercase().as_str()).copied()
}

/// 证明请求对应的表达式，未收录时返回 `False`
pub fn proof_expression(request: &str) -> &'static str {
    lookup(request).unwrap_or(UNKNOWN_PROOF)
}
