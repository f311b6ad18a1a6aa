use texpipe_bibitems::{extract_bibitems, to_plain_text};

/// Synthetic `.bbl` with `n` natbib-style entries.
fn synthetic_bbl(n: usize) -> String {
    let mut bbl = format!("\\begin{{thebibliography}}{{{n}}}\n");
    for i in 0..n {
        bbl.push_str(&format!(
            "\\bibitem[{{Author{i} et~al.(20{:02})}}]{{author{i}}}\n\
             \\bibinfo{{author}}{{A.~Author{i}}}, \\bibinfo{{author}}{{B.~Schr\\\"{{o}}der}}.\n\
             \\newblock \\emph{{On the {{\\TeX}} typesetting of item {i}}}.\n\
             \\newblock In \\textit{{Proc.\\ Conf.}}, pages {i}--{}, 20{:02}. % page range\n\n",
            i % 100,
            i + 10,
            i % 100,
        ));
    }
    bbl.push_str("\\end{thebibliography}\n");
    bbl
}

#[divan::bench(args = [10, 100, 1000])]
fn extract_bibitems_bench(bencher: divan::Bencher, n: usize) {
    let bbl = synthetic_bbl(n);
    bencher.bench(|| extract_bibitems(divan::black_box(&bbl)));
}

#[divan::bench]
fn to_plain_text_bench(bencher: divan::Bencher) {
    let text = r#"\bibinfo{author}{J.~Schr\"{o}dinger} and \bibinfo{author}{P.~Erd\H{o}s}.
\newblock \href{https://doi.org/10.0/x}{\emph{A {\LaTeX} study}}, $\alpha$-decay \& more."#;
    bencher.bench(|| to_plain_text(divan::black_box(text)));
}

fn main() {
    divan::main();
}
