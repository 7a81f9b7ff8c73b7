use loupe_core::geometry::{GeometryBox, Size};
use loupe_core::target::{
    ContentRegion, ElementKind, RegionNode, TargetKind, TargetPoll, TargetResolver,
};

fn img_node(source: &str) -> RegionNode {
    let mut node = RegionNode::new(ElementKind::Img);
    node.source = Some(source.to_string());
    node.natural = Size::new(400.0, 300.0);
    node.display = Size::new(200.0, 150.0);
    node.bounds = GeometryBox::new(10.0, 10.0, 200.0, 150.0);
    node
}

#[test]
fn test_first_matching_node_wins() {
    let mut region = ContentRegion::new();
    // A plain paragraph and a bare div are not zoomable.
    region.push(RegionNode::new(ElementKind::Other));
    region.push(RegionNode::new(ElementKind::Div));
    region.push(img_node("thumb.jpg"));

    let target = region.resolve_target().unwrap();
    assert_eq!(target.kind, TargetKind::Image);
    assert_eq!(target.source.as_deref(), Some("thumb.jpg"));
}

#[test]
fn test_div_with_source_is_container() {
    let mut region = ContentRegion::new();
    let mut node = RegionNode::new(ElementKind::Div);
    node.source = Some("background.jpg".to_string());
    region.push(node);

    assert_eq!(
        region.resolve_target().unwrap().kind,
        TargetKind::Container
    );
}

#[test]
fn test_inline_svg_classified() {
    let mut region = ContentRegion::new();
    region.push(RegionNode::new(ElementKind::Svg));
    assert_eq!(
        region.resolve_target().unwrap().kind,
        TargetKind::InlineSvg
    );
}

#[test]
fn test_explicit_image_role_flag() {
    let mut region = ContentRegion::new();
    let mut node = RegionNode::new(ElementKind::Other);
    node.image_role = true;
    region.push(node);

    assert_eq!(
        region.resolve_target().unwrap().kind,
        TargetKind::GenericImageRole
    );
}

#[test]
fn test_resolver_only_reacts_to_revision_changes() {
    let mut region = ContentRegion::new();
    region.push(img_node("thumb.jpg"));

    let mut resolver = TargetResolver::new();
    assert_eq!(resolver.poll(&region), TargetPoll::Changed);
    assert!(resolver.current().is_some());

    // Same revision: nothing re-resolves.
    assert_eq!(resolver.poll(&region), TargetPoll::Unchanged);

    // An attribute mutation bumps the revision and changes the target.
    region.update(0, |node| node.source = Some("other.jpg".to_string()));
    assert_eq!(resolver.poll(&region), TargetPoll::Changed);
    assert_eq!(
        resolver.current().unwrap().source.as_deref(),
        Some("other.jpg")
    );

    // A revision bump that leaves the resolved target identical is not a
    // change.
    region.update(0, |_| {});
    assert_eq!(resolver.poll(&region), TargetPoll::Unchanged);
}

#[test]
fn test_structural_removal_clears_target() {
    let mut region = ContentRegion::new();
    region.push(img_node("thumb.jpg"));

    let mut resolver = TargetResolver::new();
    resolver.poll(&region);
    assert!(resolver.current().is_some());

    region.clear();
    assert_eq!(resolver.poll(&region), TargetPoll::Changed);
    assert!(resolver.current().is_none());
}

#[test]
fn test_empty_region_resolves_nothing() {
    let region = ContentRegion::new();
    let mut resolver = TargetResolver::new();
    assert_eq!(resolver.poll(&region), TargetPoll::Unchanged);
    assert!(resolver.current().is_none());
}
