//! 基础设施层（Infrastructure Layer）
//!
//! 持有外部能力（本地求值器、远程 API、网络探测），只暴露能力，不包含流程

pub mod evaluator;
pub mod network_probe;
pub mod remote_client;

pub use evaluator::{Evaluator, EvaluatorKind};
pub use network_probe::{CachedProbe, NetworkProbe, StaticProbe, TcpProbe};
pub use remote_client::{OpenAiRemoteClient, RemoteClient, RemoteRequest};
