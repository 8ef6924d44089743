// src/main.rs

use aslc::diagnostics::DiagnosticBag;
use clap::Parser;
use std::fs;
use std::path::Path;
use std::process;

/// Asl 语言编译器：把源程序翻译成栈式虚拟机的三地址码
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 需要编译的源文件路径
    input_file: String,

    /// 输出文件的路径。
    /// 如果不提供，生成的程序打印到标准输出
    #[arg(short, long)]
    output_file: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let input_path = Path::new(&cli.input_file);
    let source_name = input_path.to_str().unwrap_or("unknown_file");

    let source_code = fs::read_to_string(input_path)
        .map_err(|e| format!("Failed to read file '{}': {}", cli.input_file, e))?;

    // 诊断背包收集所有阶段的错误，最后按源文件位置排序打印
    let mut diagnostics = DiagnosticBag::new(&source_code);

    let program = match aslc::compile(&source_code, &mut diagnostics) {
        Some(program) => program,
        None => {
            diagnostics.print(source_name);
            eprintln!("Compilation failed.");
            process::exit(1);
        }
    };

    match cli.output_file {
        Some(path) => {
            fs::write(&path, program)?;
        }
        None => {
            print!("{}", program);
        }
    }

    Ok(())
}
