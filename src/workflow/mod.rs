pub mod solve_ctx;
pub mod solve_dispatcher;

pub use solve_ctx::SolveCtx;
pub use solve_dispatcher::SolveDispatcher;
