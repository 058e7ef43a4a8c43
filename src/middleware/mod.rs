/*
 * Responsibility
 * - public interface of the middleware layer
 * - authz::apply (group gate), http::apply (request id / limits / access log)
 */
pub mod authz;
pub mod http;
