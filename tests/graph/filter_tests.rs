use depscope::config::FilterConfig;
use depscope::graph::builder::GraphBuilder;
use depscope::graph::filter::FrameworkFilter;

use crate::common::{assembly_ref, project};

fn filter(block: &[&str], allow: &[&str]) -> FrameworkFilter {
    FrameworkFilter::from_config(&FilterConfig {
        block_list: block.iter().map(|s| s.to_string()).collect(),
        allow_list: allow.iter().map(|s| s.to_string()).collect(),
    })
}

#[test]
fn allow_list_wins_over_block_list() {
    // S3: Microsoft.* blocked, Microsoft.MyLib.* allowed
    let projects = vec![project(
        "App",
        "Main",
        vec![
            assembly_ref("Microsoft.Extensions.Logging"),
            assembly_ref("Microsoft.MyLib.Core"),
        ],
    )];
    let built = GraphBuilder::build(&projects).unwrap().graph;
    let filtered = filter(&["Microsoft.*"], &["Microsoft.MyLib.*"]).apply(&built);

    assert_eq!(filtered.vertex_count(), built.vertex_count());
    assert_eq!(filtered.edge_count(), 1);
    let kept = filtered.graph.edge_indices().next().unwrap();
    let (_, target) = filtered.graph.edge_endpoints(kept).unwrap();
    assert_eq!(filtered.node(target).name, "Microsoft.MyLib.Core");
}

#[test]
fn default_config_blocks_framework_targets() {
    let projects = vec![project(
        "App",
        "Main",
        vec![
            assembly_ref("System.Text.Json"),
            assembly_ref("Microsoft.CSharp"),
            assembly_ref("Contoso.Billing"),
        ],
    )];
    let built = GraphBuilder::build(&projects).unwrap().graph;
    let filtered = FrameworkFilter::from_config(&FilterConfig::default()).apply(&built);
    assert_eq!(filtered.edge_count(), 1);
}

#[test]
fn vertices_survive_even_when_their_edges_drop() {
    let projects = vec![project("App", "Main", vec![assembly_ref("System.Web")])];
    let built = GraphBuilder::build(&projects).unwrap().graph;
    let filtered = filter(&["System.*"], &[]).apply(&built);
    assert_eq!(filtered.vertex_count(), 2);
    assert_eq!(filtered.edge_count(), 0);
    assert!(filtered.lookup_name("System.Web").is_some());
}

#[test]
fn filtering_is_idempotent() {
    let projects = vec![project(
        "App",
        "Main",
        vec![
            assembly_ref("System.Web"),
            assembly_ref("Contoso.Core"),
            assembly_ref("Microsoft.MyLib.Api"),
        ],
    )];
    let built = GraphBuilder::build(&projects).unwrap().graph;
    let f = filter(&["Microsoft.*", "System.*"], &["Microsoft.MyLib.*"]);
    let once = f.apply(&built);
    let twice = f.apply(&once);
    assert_eq!(once.vertex_count(), twice.vertex_count());
    assert_eq!(once.edge_count(), twice.edge_count());
}

#[test]
fn matching_is_case_insensitive() {
    let f = filter(&["microsoft.*"], &[]);
    assert!(!f.retains("Microsoft.Extensions.Hosting"));
    assert!(!f.retains("MICROSOFT.CSHARP"));
    assert!(f.retains("Microsofty.Thing"));
}

#[test]
fn exact_patterns_match_whole_names_only() {
    let f = filter(&["Newtonsoft.Json"], &[]);
    assert!(!f.retains("Newtonsoft.Json"));
    assert!(f.retains("Newtonsoft.Json.Bson"));
}
