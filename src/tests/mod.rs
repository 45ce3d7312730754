//! 单元测试模块
//! 覆盖元素工厂、树渲染、标记解析、脚本桥接

pub mod bridge_tests;
