//! 引导会话的流程测试

mod pipeline_tests;
